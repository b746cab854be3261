use std::env;
use std::io::{self, Write};
use std::sync::atomic::Ordering;
use std::thread;

use vocal_range::{default_voice_types, CaptureParams, EstimatorParams, Session, Source};

fn print_usage() {
    println!("usage: vocal-range [--device <name>] [--list-devices]");
    println!();
    println!("Listens on an input device, follows the pitch of your voice,");
    println!("and reports the lowest and highest note you hit.");
}

fn main() -> anyhow::Result<()> {
    let mut device: Option<String> = None;
    let mut list_devices = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--device" => {
                device = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--device needs a device name"))?,
                );
            }
            "--list-devices" => list_devices = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => anyhow::bail!("unknown argument '{}'", other),
        }
    }

    if list_devices {
        Source::print_devices(true)?;
        return Ok(());
    }

    let capture_params = CaptureParams::default();
    let source = Source::new(device.as_deref())?;
    let capture = source.open(&capture_params)?;

    let mut session = Session::new(EstimatorParams::default(), default_voice_types());

    let cancel = session.cancel_token();
    thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        cancel.store(true, Ordering::SeqCst);
    });

    println!("Listening... sing from your lowest note to your highest.");
    println!("Press Enter to finish.");

    let summary = session.run(capture, |pitch, range| {
        print!(
            "\rpitch {:6.1} Hz | range {:6.1} - {:6.1} Hz",
            pitch, range.low, range.high
        );
        let _ = io::stdout().flush();
    });

    println!();
    match summary.range {
        Some(range) => {
            println!("Vocal range: {:.1} - {:.1} Hz", range.low, range.high);
            println!("Voice type: {}", summary.voice_type);
        }
        None => println!("No pitch was detected. Try again closer to the microphone."),
    }
    if summary.dropped > 0 {
        eprintln!("note: {} frame(s) were lost during capture", summary.dropped);
    }

    Ok(())
}
