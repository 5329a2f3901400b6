//! Netlist editor CLI
//!
//! Loads a JSON design, runs one query or edit command against it through an
//! editing session, and optionally writes the design back.

#[global_allocator]
/// Global allocator using jemalloc.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use clap::Parser;
use itertools::Itertools;
use netedit_core::prelude::*;
use tracing::info;

use args::{Args, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.to_config()?;

    info!("Loading design: {}", args.design.display());
    let design = load_design(&args.design)?;
    let mut session = Session::open(design, config)?;

    run(&mut session, &args.command)?;

    if args.write && args.command.mutates() {
        save_design(session.db(), &args.design)?;
        info!("Wrote design: {}", args.design.display());
    }
    Ok(())
}

fn run(session: &mut Session<MemoryDesign>, command: &Command) -> Result<(), EditError> {
    match command {
        Command::Cells(query) => {
            for cell in session.get_cells(&query.into())? {
                println!("{cell}");
            }
        }
        Command::Nets(query) => {
            for net in session.get_nets(&query.into())? {
                println!("{net}");
            }
        }
        Command::Info { cell } => {
            println!("name:       {}", session.get_name(cell)?);
            println!("type:       {}", session.get_type(cell)?.as_deref().unwrap_or("<black box>"));
            println!("status:     {}", session.placement_status(cell)?);
            if let Some(placement) = session.db().cell_placement(cell)? {
                println!("bel:        {}", placement.bel);
            }
            println!("primitives: {}", session.get_primitives(cell)?.iter().join(" "));
        }
        Command::New { name, template } => session.new_cell(name, template.as_deref())?,
        Command::Delete { cells } => {
            for cell in cells {
                session.delete_cell(cell)?;
            }
        }
        Command::Rename { cell, new_name } => session.rename_cell(cell, new_name)?,
        Command::Duplicate { reference, new_name } => {
            let report = session.duplicate(reference, new_name)?;
            println!("copied: {}", report.copied.iter().join(" "));
            for (key, reason) in &report.skipped {
                println!("skipped {key}: {reason}");
            }
        }
        Command::Place { cell, location } => {
            let placement = session.place(cell, location)?;
            println!("{cell} -> {}", placement.bel);
        }
        Command::Unplace { cell } => match session.unplace(cell)? {
            Some(bel) => println!("{cell} released {bel}"),
            None => println!("{cell} was not placed"),
        },
        Command::Legal { cell, location } => println!("{}", session.is_placement_legal(cell, location)?),
        Command::Compatible { cell, location } => println!("{}", session.compatible_with(cell, location)?),
        Command::Insert {
            net,
            cell,
            sinks,
            in_pin,
            out_pin,
            downhill_net,
        } => {
            let mut request = InsertRequest::new(net.as_str()).sinks(sinks.iter().cloned());
            if let Some(cell) = cell {
                request = request.cell(cell.as_str());
            }
            if let Some(pin) = in_pin {
                request = request.in_pin(pin.as_str());
            }
            if let Some(pin) = out_pin {
                request = request.out_pin(pin.as_str());
            }
            if let Some(name) = downhill_net {
                request = request.downhill_net(name.as_str());
            }
            let outcome = session.insert(&request)?;
            println!(
                "{} ({} -> {}) drives {} with {} sink(s)",
                outcome.cell,
                outcome.in_pin,
                outcome.out_pin,
                outcome.downhill_net,
                outcome.moved_sinks.len()
            );
        }
        Command::Tie { cells } => {
            let mut tied = 0;
            for cell in cells {
                tied += session.tie_unused_pins(cell)?;
            }
            println!("tied {tied} pin(s)");
        }
    }
    Ok(())
}
