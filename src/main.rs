// SPDX-License-Identifier: MIT
//
// ansi-pants — small terminal toys built on pants-term.
//
// Each demo is a `Hooks` implementor; the engine owns the terminal, the
// frame loop and the teardown. Pick one by name, optionally with a frame
// rate:
//
//   ansi-pants colors          random glyphs in random colors
//   ansi-pants box 60          a pulsing box-drawing square
//   ansi-pants starfield       falling stars in parallax layers
//   ansi-pants ticker          scrolling marquee lines
//   ansi-pants balls           truecolor balls bouncing off the edges
//
// Press q to quit any of them. Ctrl-C also ends a demo cleanly, exiting
// with the conventional 128 + signal status.

mod demos;
mod logging;

use std::env;
use std::process;

use anyhow::Context;
use tracing::info;

use demos::Demo;

fn usage() -> String {
    let names: Vec<&str> = Demo::ALL.iter().map(|d| d.name()).collect();
    format!("usage: ansi-pants <{}> [fps]", names.join("|"))
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(name) = args.first() else {
        eprintln!("{}", usage());
        process::exit(2);
    };
    let Some(demo) = Demo::from_name(name) else {
        eprintln!("ansi-pants: unknown demo {name:?}");
        eprintln!("{}", usage());
        process::exit(2);
    };

    let mut config = demo.config();
    if let Some(fps) = args.get(1) {
        config = config.with_fps(
            fps.parse()
                .with_context(|| format!("invalid frame rate {fps:?}"))?,
        );
    }

    let logging = logging::init();
    if let Some(guard) = &logging {
        eprintln!("ansi-pants: logging to {}", guard.log_dir().display());
    }
    info!(demo = demo.name(), fps = config.fps, "starting demo");

    match demo.run(config) {
        Err(pants_term::Error::Interrupted(signal)) => {
            info!(signal, "demo interrupted");
            // The terminal is already restored; exit like the shell expects.
            drop(logging);
            process::exit(128 + signal);
        }
        result => result.with_context(|| format!("demo {} failed", demo.name()))?,
    }

    println!("goodbye!");
    Ok(())
}
