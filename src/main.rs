// main.rs      gifweave command
//
// Copyright (c) 2026  The gifweave Developers
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gifweave::{Color, ColorGrid, Container, TableRef};
use image::ImageReader;
use std::error::Error;
use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use termcolor::{Color as TermColor, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Auto);
    match create_app().get_matches().subcommand() {
        ("wrap", Some(matches)) => wrap(&mut out, matches)?,
        _ => unreachable!(),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("gifweave")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("Animated GIF encoder")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("wrap")
                .about("Wrap PNM (PPM) frames into a GIF")
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .required(true)
                        .help("output GIF file"),
                )
                .arg(
                    Arg::with_name("delay")
                        .short("d")
                        .long("delay")
                        .takes_value(true)
                        .default_value("10")
                        .help("frame delay (centiseconds)"),
                )
                .arg(
                    Arg::with_name("loop")
                        .short("l")
                        .long("loop")
                        .takes_value(true)
                        .help("loop count (0: forever; omit: play once)"),
                )
                .arg(
                    Arg::with_name("local")
                        .long("local")
                        .help("give each frame a local color table"),
                )
                .arg(
                    Arg::with_name("diff")
                        .long("diff")
                        .help("make unchanged pixels transparent"),
                )
                .arg(
                    Arg::with_name("comment")
                        .short("c")
                        .long("comment")
                        .takes_value(true)
                        .help("comment to embed"),
                )
                .arg(
                    Arg::with_name("frames")
                        .required(true)
                        .min_values(1)
                        .help("input PNM frame(s)"),
                ),
        )
}

/// Handle wrap subcommand
fn wrap(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let delay: u16 = matches.value_of("delay").unwrap_or("10").parse()?;
    let loop_count = match matches.value_of("loop") {
        Some(l) => Some(l.parse::<u16>()?),
        None => None,
    };
    let local = matches.is_present("local");
    let mut gif = Container::new();
    gif.set_loop_count(loop_count);
    if let Some(comment) = matches.value_of("comment") {
        gif.add_comment(comment);
    }
    if let Some(paths) = matches.values_of_os("frames") {
        for path in paths {
            let grid = read_ppm(path)?;
            let i = if local {
                gif.add_frame_local(grid)?
            } else {
                gif.add_frame(grid)?
            };
            gif.frame_mut(i).set_delay_time_cs(delay);
        }
    }
    if matches.is_present("diff") {
        gif.diff_frames()?;
    }
    let output = matches.value_of_os("output").unwrap_or_default();
    gif.encode(File::create(output)?)?;
    summary(out, &gif, output)
}

/// Print a summary table of the encoded GIF
fn summary(
    out: &mut StandardStream,
    gif: &Container,
    path: &OsStr,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(TermColor::Magenta));
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(TermColor::Yellow)).set_intense(true);
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(TermColor::White))
        .set_intense(true)
        .set_bold(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(TermColor::White));
    let (width, height) = gif.screen_size()?;
    out.set_color(&magenta)?;
    writeln!(out, "{}", path.to_string_lossy())?;
    out.set_color(&bold)?;
    write!(out, "{}x{}, frames: {}", width, height, gif.frames().len())?;
    match gif.loop_count() {
        Some(0) => writeln!(out, ", repeat: ∞")?,
        Some(c) => writeln!(out, ", repeat: {}", c)?,
        None => writeln!(out)?,
    }
    out.set_color(&yellow)?;
    writeln!(out, " Fr#  Delay Clrs Trn")?;
    for (n, frame) in gif.frames().iter().enumerate() {
        out.set_color(&bold)?;
        write!(out, " {:>3}", n)?;
        out.set_color(&dflt)?;
        write!(out, " {:6.2}", f32::from(frame.delay_time_cs()) / 100.0)?;
        match frame.table() {
            TableRef::Global => {
                write!(out, " {:3}g", gif.global_table().declared_len())?
            }
            TableRef::Local(t) => {
                out.set_color(&bold)?;
                write!(out, "  {:3}", t.declared_len())?;
            }
        }
        writeln!(
            out,
            " {:>3}",
            if frame.has_transparency() { "yes" } else { "-" }
        )?;
    }
    Ok(())
}

/// Read a PNM (P6 PPM) frame as a color grid
fn read_ppm(path: &OsStr) -> Result<ColorGrid, Box<dyn Error>> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .into_rgb8();
    let width = u16::try_from(img.width())?;
    let height = u16::try_from(img.height())?;
    let pixels = img.pixels().map(|p| Color::from(p.0)).collect();
    Ok(ColorGrid::with_pixels(width, height, pixels)?)
}
