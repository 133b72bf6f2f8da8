// Read the NDEF URI record from a MIFARE Ultralight tag.

// Demonstrates the library surface without the CLI: open the first libnfc
// reader, attach to the tag in the field, and print what it holds.
// Requires `--features libnfc`.

use ulndef::actions;
use ulndef::prelude::*;
use ulndef::transport::LibnfcTransport;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut context = nfc1::Context::new()?;
    let transport = LibnfcTransport::open_reader(&mut context, None)?;
    let mut session = Session::open(Box::new(transport), None)?;

    println!("Waiting for a tag...");
    actions::attach(&mut session, None)?;
    println!("Found {} with UID {}", session.kind(), session.uid_hex());

    match actions::read_tag(&mut session) {
        Ok(report) => println!("URL: {}", report.url),
        Err(Error::NotNdef { .. } | Error::NotUri) => {
            println!("Tag holds no URI record.");
        }
        Err(err) => return Err(err.into()),
    }

    session.close();
    Ok(())
}
