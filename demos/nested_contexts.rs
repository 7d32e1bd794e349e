//! Nested context example
//!
//! Demonstrates contexts prepending fixed fields, scoped activation, and a
//! context keeping its parent after the active sink changes.
//!
//! Run with: cargo run --example nested_contexts

use rust_field_sink::prelude::*;
use std::sync::Arc;

fn handle_request(id: i64) -> Result<()> {
    with_context(&[int_field("request", id)?], || {
        write_fields(&[string_field("phase", "start")?])?;
        write_fields(&[string_field("phase", "done")?, int_field("status", 200)?])
    })
}

fn main() -> Result<()> {
    println!("=== Rust Field Sink - Nested Contexts Example ===\n");

    println!("1. Service context wrapping per-request contexts:");
    with_context(&[string_field("service", "billing")?], || {
        handle_request(1)?;
        handle_request(2)
    })?;

    println!("\n2. Capturing into memory with JSON lines:");
    let memory = Arc::new(MemorySink::new().with_format(LineFormat::Json));
    activate(memory.clone(), || handle_request(3))?;
    for line in memory.lines() {
        println!("   {}", line);
    }

    println!("\n3. A context stays bound to the sink active when it was created:");
    let bound = ContextSink::new(&[string_field("bound_to", "stdout")?]);
    activate(memory.clone(), || bound.write(&[bool_field("redirected", false)?]))?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
