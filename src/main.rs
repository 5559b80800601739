//! Minimal CLI for the Sigil rewrite. Commands are intentionally small and
//! auditable so operators can see exactly how text, key, and image relate.

use std::env;

use sigil_rs::config::{load_options, RenderOptions};
use sigil_rs::container::load_png;
use sigil_rs::identicon::{generate, generate_encrypted, restore};

fn print_usage() {
    eprintln!("Commands:\n  generate <text> <key> <output.png> [options.json]\n  generate-plain <text> <output.png> [options.json]\n  restore <input.png> <key>\n  inspect <input.png>");
}

fn options_from(arg: Option<&String>) -> Option<RenderOptions> {
    match arg {
        Some(path) => match load_options(path) {
            Ok(options) => Some(options),
            Err(err) => {
                eprintln!("options rejected: {err}");
                None
            }
        },
        None => Some(RenderOptions::default()),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "generate" => {
            if args.len() != 5 && args.len() != 6 {
                return print_usage();
            }
            let options = match options_from(args.get(5)) {
                Some(options) => options,
                None => return,
            };
            match generate_encrypted(&args[2], &args[3], &options) {
                Ok(identicon) => match identicon.save(&args[4]) {
                    Ok(()) => println!("wrote {} ({} = {})", args[4], identicon.metadata.name, identicon.metadata.value),
                    Err(err) => eprintln!("save failed: {err}"),
                },
                Err(err) => eprintln!("generation failed: {err}"),
            }
        }
        "generate-plain" => {
            if args.len() != 4 && args.len() != 5 {
                return print_usage();
            }
            let options = match options_from(args.get(4)) {
                Some(options) => options,
                None => return,
            };
            match generate(&args[2], &options) {
                Ok(identicon) => match identicon.save(&args[3]) {
                    Ok(()) => println!("wrote {} ({} = {})", args[3], identicon.metadata.name, identicon.metadata.value),
                    Err(err) => eprintln!("save failed: {err}"),
                },
                Err(err) => eprintln!("generation failed: {err}"),
            }
        }
        "restore" => {
            if args.len() != 4 {
                return print_usage();
            }
            let container = match load_png(&args[2]) {
                Ok(container) => container,
                Err(err) => return eprintln!("cannot open container: {err}"),
            };
            match restore(&container, &args[3]) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("restore failed: {err}"),
            }
        }
        "inspect" => {
            if args.len() != 3 {
                return print_usage();
            }
            match load_png(&args[2]) {
                Ok(container) => {
                    let (width, height) = container.image().dimensions();
                    println!("raster: {width}x{height}");
                    for (name, value) in container.texts() {
                        println!("{name} = {value}");
                    }
                }
                Err(err) => eprintln!("cannot open container: {err}"),
            }
        }
        _ => print_usage(),
    }
}
