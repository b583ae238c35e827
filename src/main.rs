use std::error::Error;

use qrcraft::{ECLevel, Encoder, EncoderConfig};

const DEFAULT_TEXT: &str = "https://crates.io/crates/qrcraft";

const USAGE: &str = "Usage: qrcraft [-corr L|M|Q|H] [-o out.png] [TEXT]";

struct Args {
    ec_level: ECLevel,
    out: Option<String>,
    text: String,
}

fn parse_ec_level(s: &str) -> Option<ECLevel> {
    match s {
        "L" => Some(ECLevel::L),
        "M" => Some(ECLevel::M),
        "Q" => Some(ECLevel::Q),
        "H" => Some(ECLevel::H),
        _ => None,
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut res = Args { ec_level: ECLevel::L, out: None, text: DEFAULT_TEXT.to_string() };
    let mut text = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-corr" | "--corr" => {
                let lvl = args.next().ok_or("Missing value for -corr")?;
                res.ec_level = parse_ec_level(&lvl).ok_or(format!("Unknown correction level: {lvl}"))?;
            }
            "-o" | "--out" => res.out = Some(args.next().ok_or("Missing value for -o")?),
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => text.push(arg),
        }
    }
    if !text.is_empty() {
        res.text = text.join(" ");
    }
    Ok(res)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            if msg != USAGE {
                eprintln!("{USAGE}");
            }
            std::process::exit(2);
        }
    };

    let encoder = Encoder::new(EncoderConfig::new().ec_level(args.ec_level))?;
    let qr = encoder.encode(args.text.as_bytes())?;

    match args.out {
        Some(path) => {
            qr.to_image(8).save(&path)?;
            println!("{qr}");
            println!("Saved to {path}");
        }
        None => {
            println!("{qr}");
            println!("{}", qr.to_str(1));
        }
    }

    Ok(())
}
