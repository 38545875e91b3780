//! Host-side CLI for the ook-transmitter library.
//!
//! Sends a code via a 433/315 MHz OOK transmitter hooked to a Linux GPIO pin,
//! or brute-forces a code space with one of the three search strategies. Pin
//! export, direction setup and release are owned here, not by the library.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use ook_transmitter::search::{self, CancelToken};
use ook_transmitter::{
    Code, LineLevel, PulseDevice, TimingOverrides, Transmitter, WildcardPattern, protocol,
};

const BANNER: &str = r"
          ##          ##
            ##      ##
          ##############
       ####   #####   ####
      #####################
    ## ################### ##
    ##   ##           ##   ##
           ####   ####

             ooktx
";

/// Sends a decimal code via a 433/315MHz GPIO device
#[derive(Parser, Debug)]
#[command(name = "ooktx", version, about)]
struct Args {
    /// Send a single code given as a binary string
    #[arg(short = 'm', long = "code", value_name = "BINARY_STRING")]
    code: Option<String>,

    /// Bruteforce mode: 1 - count up, 2 - random, 3 - guess based on '?'
    #[arg(long = "bf", value_name = "MODE", value_parser = clap::value_parser!(u8).range(1..=3))]
    bruteforce_mode: Option<u8>,

    /// Base pattern over '0', '1' and '?' for bruteforce mode 3
    #[arg(short = 's', long = "base-code", value_name = "PATTERN")]
    base_code: Option<String>,

    /// Code length in bits for bruteforce modes 1 and 2
    #[arg(short = 'l', long, default_value_t = 24)]
    length: u8,

    /// Protocol id(s) to use; pass "all" to iterate every registered protocol
    #[arg(short = 't', long = "protocol", num_args = 1.., default_value = "1")]
    protocols: Vec<String>,

    /// GPIO pin
    #[arg(short = 'g', long, default_value_t = 17)]
    gpio: u32,

    /// Repeat cycles per transmission
    #[arg(short = 'r', long, default_value_t = 10)]
    repeat: u32,

    /// Timeout in milliseconds between protocols
    #[arg(long = "timeout", visible_alias = "to", default_value_t = 0)]
    timeout: u64,

    /// Pulselength override in microseconds
    #[arg(short = 'p', long)]
    pulselength: Option<u32>,

    /// Override sync high pulse length (ticks)
    #[arg(long)]
    sync_pulse: Option<u32>,

    /// Override sync low space length (ticks)
    #[arg(long)]
    sync_space: Option<u32>,

    /// Override zero high pulse length (ticks)
    #[arg(long)]
    zero_pulse: Option<u32>,

    /// Override zero low space length (ticks)
    #[arg(long)]
    zero_space: Option<u32>,

    /// Override one high pulse length (ticks)
    #[arg(long)]
    one_pulse: Option<u32>,

    /// Override one low space length (ticks)
    #[arg(long)]
    one_space: Option<u32>,
}

fn main() -> ExitCode {
    println!("{BANNER}");

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let protocol_ids = parse_protocols(&args.protocols)?;
    let overrides = build_overrides(&args);

    let device = SysfsGpio::acquire(args.gpio)?;
    let mut tx = Transmitter::new(device);
    tx.set_repeat(args.repeat);

    if let Some(code_str) = args.code.as_deref() {
        let code = Code::from_binary_str(code_str)?;
        report_send(&code, &protocol_ids);
        tx.broadcast(code, &protocol_ids, &overrides, args.timeout * 1000)?;
        return Ok(());
    }

    let Some(mode) = args.bruteforce_mode else {
        return Err("either -m (single code) or --bf (bruteforce mode) must be specified".into());
    };

    let cancel = CancelToken::new();
    let mut rng = rand::thread_rng();
    let outcome = match mode {
        1 => {
            report_sweep(&format!("counting up through {} bits", args.length));
            search::sweep_ascending(&mut tx, args.length, &protocol_ids, &overrides, &cancel)?
        }
        2 => {
            report_sweep(&format!("random order through {} bits", args.length));
            search::sweep_random(
                &mut tx,
                args.length,
                &protocol_ids,
                &overrides,
                &mut rng,
                &cancel,
            )?
        }
        _ => {
            let base = args
                .base_code
                .as_deref()
                .ok_or("for --bf 3, a base pattern (-s) must be specified")?;
            let pattern: WildcardPattern = base.parse()?;
            report_sweep(&format!(
                "pattern {} ({} free bits)",
                base,
                pattern.num_wildcards()
            ));
            search::sweep_pattern(&mut tx, &pattern, &protocol_ids, &overrides, &mut rng, &cancel)?
        }
    };

    println!(
        "{} {} codes sent",
        "Done:".cyan(),
        outcome.codes_sent.to_string().yellow()
    );
    Ok(())
}

fn parse_protocols(specs: &[String]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if specs.iter().any(|s| s == "all") {
        return Ok(protocol::all_ids().collect());
    }

    let mut ids = Vec::with_capacity(specs.len());
    for spec in specs {
        let id: u8 = spec
            .parse()
            .map_err(|_| format!("invalid protocol id {spec:?}"))?;
        protocol::resolve(id)?;
        ids.push(id);
    }
    Ok(ids)
}

fn build_overrides(args: &Args) -> TimingOverrides {
    let mut overrides = TimingOverrides::none();
    if let Some(v) = args.pulselength {
        overrides = overrides.pulselength(v);
    }
    if let Some(v) = args.sync_pulse {
        overrides = overrides.sync_high(v);
    }
    if let Some(v) = args.sync_space {
        overrides = overrides.sync_low(v);
    }
    if let Some(v) = args.zero_pulse {
        overrides = overrides.zero_high(v);
    }
    if let Some(v) = args.zero_space {
        overrides = overrides.zero_low(v);
    }
    if let Some(v) = args.one_pulse {
        overrides = overrides.one_high(v);
    }
    if let Some(v) = args.one_space {
        overrides = overrides.one_low(v);
    }
    overrides
}

fn report_send(code: &Code, protocol_ids: &[u8]) {
    let binary = format!("{:0width$b}", code.value, width = code.bit_length as usize);
    println!(
        "{} {}",
        "Sending Code:".cyan(),
        code.value.to_string().yellow()
    );
    println!("Binary: {}", binary.green());
    println!("Decimal: {}", code.value.to_string().green());
    println!("Hexadecimal: {}", format!("{:X}", code.value).green());

    let ids = protocol_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Protocol: {}", ids.green());
}

fn report_sweep(what: &str) {
    println!("{} {}", "Bruteforcing:".cyan(), what.yellow());
}

/// GPIO line driven through the Linux sysfs interface.
struct SysfsGpio {
    pin: u32,
    value_path: PathBuf,
}

impl SysfsGpio {
    /// Exports the pin, sets it to output and drives it low.
    fn acquire(pin: u32) -> std::io::Result<Self> {
        let dir = PathBuf::from(format!("/sys/class/gpio/gpio{pin}"));
        if !dir.exists() {
            fs::write("/sys/class/gpio/export", pin.to_string())?;
        }
        fs::write(dir.join("direction"), "out")?;

        let mut gpio = Self {
            pin,
            value_path: dir.join("value"),
        };
        gpio.set_output(LineLevel::Low)?;
        Ok(gpio)
    }
}

impl PulseDevice for SysfsGpio {
    type Error = std::io::Error;

    fn set_output(&mut self, level: LineLevel) -> Result<(), Self::Error> {
        let value = match level {
            LineLevel::High => "1",
            LineLevel::Low => "0",
        };
        fs::write(&self.value_path, value)
    }

    fn wait(&mut self, micros: u64) -> Result<(), Self::Error> {
        thread::sleep(Duration::from_micros(micros));
        Ok(())
    }
}

impl Drop for SysfsGpio {
    fn drop(&mut self) {
        let _ = fs::write("/sys/class/gpio/unexport", self.pin.to_string());
    }
}
