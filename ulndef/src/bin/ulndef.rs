// ulndef/src/bin/ulndef.rs

//! `ulndef` command line tool.
//!
//! Actions are positional, last one wins: `l` lists readers, `r` reads the
//! URI record, `w <URL>` writes one and verifies it by reading back.
//! `-json` switches to the silent machine-readable envelopes.

use std::process::ExitCode;

use ulndef::Pwd;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    List,
    Read,
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    action: Action,
    json: bool,
    pwd: Option<Pwd>,
    device: Option<String>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [l|r|w <URL>] [-json] [-pwd <8 hex digits>] [-device <connstring>]\n\
         \n\
         Actions (the last one given wins):\n\
         \x20 l          list NFC readers\n\
         \x20 r          read the NDEF URI record from the tag\n\
         \x20 w <URL>    write <URL> to the tag and read it back\n\
         \n\
         Options:\n\
         \x20 -json              print one line of JSON, no progress output\n\
         \x20 -pwd <8 hex>       authenticate EV1 tags with this password\n\
         \x20 -device <conn>     open this reader instead of the first one"
    )
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut action = None;
    let mut json = false;
    let mut pwd = None;
    let mut device = None;

    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "l" => action = Some(Action::List),
            "r" => action = Some(Action::Read),
            "w" => {
                let url = iter.next().ok_or("w needs a URL argument")?;
                action = Some(Action::Write(url.clone()));
            }
            "-json" => json = true,
            "-pwd" => {
                let hex = iter.next().ok_or("-pwd needs 8 hex digits")?;
                pwd = Some(Pwd::from_hex(hex).map_err(|e| e.to_string())?);
            }
            "-device" => {
                let conn = iter.next().ok_or("-device needs a connection string")?;
                device = Some(conn.clone());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        action: action.ok_or("no action given")?,
        json,
        pwd,
        device,
    })
}

fn main() -> ExitCode {
    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("ulndef");
    let args = match parse_args(&argv[1..]) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n\n{}", usage(program));
            return ExitCode::FAILURE;
        }
    };

    run(&args)
}

#[cfg(feature = "libnfc")]
fn run(args: &Args) -> ExitCode {
    use ulndef::output::{to_json, DeviceEntry};
    use ulndef::tag::Session;
    use ulndef::transport::LibnfcTransport;

    let mut context = match nfc1::Context::new() {
        Ok(context) => context,
        Err(err) => {
            eprintln!("libnfc initialisation failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if args.action == Action::List {
        return match LibnfcTransport::probe_devices(&mut context) {
            Ok(devices) => {
                let entries: Vec<DeviceEntry> = devices.into_iter().map(Into::into).collect();
                if args.json {
                    println!("{}", to_json(&entries));
                } else if entries.is_empty() {
                    println!("No NFC device found.");
                } else {
                    for entry in &entries {
                        println!("{}: {}", entry.name, entry.connection_string);
                    }
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    let transport = match LibnfcTransport::open_reader(&mut context, args.device.as_deref()) {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let session = match Session::open(Box::new(transport), args.device.as_deref()) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    run_tag_action(session, args)
}

#[cfg(not(feature = "libnfc"))]
fn run(_args: &Args) -> ExitCode {
    eprintln!("built without the `libnfc` feature; no reader support");
    ExitCode::FAILURE
}

#[cfg(feature = "libnfc")]
fn run_tag_action(mut session: ulndef::tag::Session<'_>, args: &Args) -> ExitCode {
    let code = tag_action(&mut session, args);
    session.close();
    code
}

#[cfg(feature = "libnfc")]
fn tag_action(session: &mut ulndef::tag::Session<'_>, args: &Args) -> ExitCode {
    use ulndef::actions;
    use ulndef::output::{to_json, TagEnvelope};
    use ulndef::Error;

    if let Err(err) = actions::attach(session, args.pwd) {
        return match err {
            Error::NoTag if args.json => {
                println!("{}", to_json(&TagEnvelope::not_found()));
                ExitCode::SUCCESS
            }
            err => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    if !args.json {
        println!(
            "Found {} with UID {}.",
            session.kind(),
            session.uid_hex()
        );
    }

    let outcome = match &args.action {
        Action::Read => actions::read_tag(session),
        Action::Write(url) => actions::write_tag(session, url),
        Action::List => unreachable!("handled before the session opens"),
    };

    match outcome {
        Ok(report) => {
            if args.json {
                println!("{}", to_json(&TagEnvelope::from(report)));
            } else {
                let pages = session.managed_pages();
                println!("Done, {pages} of {pages} pages read (0 pages failed).");
                println!("URL: {}", report.url);
            }
            ExitCode::SUCCESS
        }
        // A tag without a (URI) record is an answer, not a failure, in
        // silent mode.
        Err(Error::NotNdef { .. } | Error::NotUri)
            if args.json && matches!(args.action, Action::Read) =>
        {
            println!("{}", to_json(&TagEnvelope::without_url(session.uid_hex())));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_read_with_flags() {
        let args = parse_args(&argv(&["r", "-json"])).unwrap();
        assert_eq!(args.action, Action::Read);
        assert!(args.json);
        assert!(args.pwd.is_none());
    }

    #[test]
    fn parse_write_takes_url() {
        let args = parse_args(&argv(&["w", "https://www.example.com"])).unwrap();
        assert_eq!(
            args.action,
            Action::Write("https://www.example.com".into())
        );
    }

    #[test]
    fn last_action_wins() {
        let args = parse_args(&argv(&["l", "w", "https://x.y", "r"])).unwrap();
        assert_eq!(args.action, Action::Read);
    }

    #[test]
    fn pwd_must_be_eight_hex_digits() {
        assert!(parse_args(&argv(&["r", "-pwd", "0011aaff"])).is_ok());
        assert!(parse_args(&argv(&["r", "-pwd", "xyz"])).is_err());
        assert!(parse_args(&argv(&["r", "-pwd"])).is_err());
    }

    #[test]
    fn no_action_is_an_error() {
        assert!(parse_args(&argv(&["-json"])).is_err());
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn device_flag_is_kept() {
        let args = parse_args(&argv(&["r", "-device", "pn532_uart:/dev/ttyUSB0"])).unwrap();
        assert_eq!(args.device.as_deref(), Some("pn532_uart:/dev/ttyUSB0"));
    }
}
