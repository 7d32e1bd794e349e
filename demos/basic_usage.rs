//! Basic field sink usage example
//!
//! Demonstrates writing typed fields to stdout and to a caller-owned buffer.
//!
//! Run with: cargo run --example basic_usage

use chrono::Utc;
use rust_field_sink::prelude::*;
use rust_field_sink::emit;

fn main() -> Result<()> {
    println!("=== Rust Field Sink - Basic Usage Example ===\n");

    println!("1. Writing to the thread's default sink (stdout):");
    write_fields(&[
        string_field("event", "startup")?,
        int_field("workers", 4)?,
        bool_field("tls", true)?,
        time_field("at", Utc::now().naive_utc())?,
    ])?;
    emit!("event" => "ready", "port" => 8080)?;

    println!("\n2. Writing to a borrowed buffer:");
    let mut buffer = Vec::new();
    {
        let sink = StreamSink::borrowed(&mut buffer);
        sink.write(&[string_field("user", "alice")?, int_field("attempt", 1)?])?;
        sink.write(&[])?;
    }
    print!("{}", String::from_utf8_lossy(&buffer));

    println!("\n3. Rejecting an empty field name:");
    match int_field("", 1) {
        Err(e) => println!("   {}", e),
        Ok(_) => unreachable!("empty names are rejected"),
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
