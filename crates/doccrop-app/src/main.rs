// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// doccrop — find the document in a photo, optionally adjust the corners, and
// export the crop.
//
// Entry point. Initialises logging, loads settings, and drives the workflow
// against the headless shell: corner drags given on the command line are
// replayed as pointer events through the same editor state machine a
// graphical shell would feed.

mod workflow;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use doccrop_bridge::{DirectoryDownloads, HeadlessSurface, MouseKind, RawPointerEvent};
use doccrop_core::error::Result;
use doccrop_core::{AppConfig, ExportMode, Handle, Point, Size, Viewport};

use workflow::{Status, Workflow};

/// Detect a document in a photo and export the cropped page as JPEG.
#[derive(Debug, Parser)]
#[command(name = "doccrop", version, about)]
struct Cli {
    /// Photo to process (JPEG, PNG, ...).
    image: PathBuf,

    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the cropped image is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Save the editor view (display copy with the selection) to this file.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Drag the top-left corner to X,Y (display pixels).
    #[arg(long, value_parser = parse_point, value_name = "X,Y")]
    drag_start: Option<Point>,

    /// Drag the bottom-right corner to X,Y (display pixels).
    #[arg(long, value_parser = parse_point, value_name = "X,Y")]
    drag_end: Option<Point>,

    /// Restore the detected corners after the drags.
    #[arg(long)]
    reset: bool,

    /// Crop the downscaled display copy instead of the original image.
    #[arg(long)]
    display_export: bool,
}

fn parse_point(value: &str) -> std::result::Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {value:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid coordinate {s:?}: {err}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(image = %cli.image.display(), "doccrop starting");

    let mut flow = match build_workflow(&cli) {
        Ok(flow) => flow,
        Err(err) => {
            let human = doccrop_core::human_errors::humanize_error(&err);
            eprintln!("{human}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &mut flow) {
        Ok(()) => {
            if let Status::Exported { path } = flow.status() {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "doccrop failed");
            if let Status::Failed(human) = flow.status() {
                eprintln!("{human}");
            } else {
                eprintln!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn build_workflow(cli: &Cli) -> Result<Workflow<HeadlessSurface, DirectoryDownloads>> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if cli.display_export {
        config.export.mode = ExportMode::Display;
    }
    Workflow::new(
        config,
        // Resized to the display copy once the image is processed.
        HeadlessSurface::unscaled(Size::new(1, 1)),
        DirectoryDownloads::new(&cli.out_dir),
    )
}

fn run(cli: &Cli, flow: &mut Workflow<HeadlessSurface, DirectoryDownloads>) -> Result<()> {
    flow.submit_path(&cli.image)?;

    if let Some(size) = flow.session().map(|s| s.display_size()) {
        flow.surface_mut().set_viewport(Viewport::unscaled(size));
    }

    for (handle, target) in [(Handle::Start, cli.drag_start), (Handle::End, cli.drag_end)] {
        if let Some(target) = target {
            drag_corner(flow, handle, target)?;
        }
    }
    if cli.reset {
        flow.reset()?;
    }

    if let Some(path) = &cli.preview {
        flow.surface().save_last_frame(path)?;
        tracing::info!(path = %path.display(), "Preview saved");
    }

    flow.export()?;
    Ok(())
}

/// Press on the corner's current position, move to `target`, release.
///
/// When the press would grab the other corner (both corners within the hit
/// tolerance, as after a zero-area detection) the corner is placed directly.
fn drag_corner(
    flow: &mut Workflow<HeadlessSurface, DirectoryDownloads>,
    handle: Handle,
    target: Point,
) -> Result<()> {
    let Some(session) = flow.session() else {
        return Ok(());
    };
    let from = session.selection().corner(handle);
    if session.hit_test(from) != Some(handle) {
        return flow.place_corner(handle, target);
    }
    for (kind, at) in [
        (MouseKind::Down, from),
        (MouseKind::Move, target),
        (MouseKind::Up, target),
    ] {
        flow.pointer(&RawPointerEvent::mouse(kind, at.x, at.y))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use image::{DynamicImage, GrayImage, Luma};

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("600,410").unwrap(), Point::new(600.0, 410.0));
        assert_eq!(parse_point(" 1.5 , -2 ").unwrap(), Point::new(1.5, -2.0));
        assert!(parse_point("600").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn cli_accepts_full_argument_set() {
        let cli = Cli::try_parse_from([
            "doccrop",
            "page.jpg",
            "--out-dir",
            "out",
            "--drag-end",
            "600,410",
            "--reset",
            "--display-export",
        ])
        .unwrap();
        assert_eq!(cli.image, PathBuf::from("page.jpg"));
        assert_eq!(cli.drag_end, Some(Point::new(600.0, 410.0)));
        assert!(cli.drag_start.is_none());
        assert!(cli.reset && cli.display_export);
    }

    #[test]
    fn drag_end_moves_end_on_zero_area_detection() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("flat.png");
        DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 200, Luma([180u8])))
            .save(&input)
            .unwrap();

        let args: Vec<OsString> = vec![
            "doccrop".into(),
            input.into(),
            "--out-dir".into(),
            dir.path().into(),
            "--drag-end".into(),
            "200,150".into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let mut flow = build_workflow(&cli).unwrap();
        run(&cli, &mut flow).unwrap();

        let selection = flow.session().unwrap().selection();
        assert_eq!(selection.start, Point::new(0.0, 0.0));
        assert_eq!(selection.end, Point::new(200.0, 150.0));
        assert!(dir.path().join("cropped-image.jpg").exists());
    }

    #[test]
    fn run_writes_crop_and_preview() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.png");
        let img = GrayImage::from_fn(400, 300, |x, y| {
            if (60..340).contains(&x) && (50..250).contains(&y) {
                Luma([if (x / 8 + y / 8) % 2 == 0 { 235u8 } else { 20 }])
            } else {
                Luma([128u8])
            }
        });
        DynamicImage::ImageLuma8(img).save(&input).unwrap();

        let out_dir = dir.path().join("out");
        let preview = dir.path().join("preview.png");
        let args: Vec<OsString> = vec![
            "doccrop".into(),
            input.clone().into(),
            "--out-dir".into(),
            out_dir.clone().into(),
            "--preview".into(),
            preview.clone().into(),
            "--drag-start".into(),
            "20,20".into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        let mut flow = build_workflow(&cli).unwrap();
        run(&cli, &mut flow).unwrap();

        assert_eq!(
            flow.session().unwrap().selection().start,
            Point::new(20.0, 20.0)
        );
        assert!(out_dir.join("cropped-image.jpg").exists());
        assert_eq!(image::open(&preview).unwrap().width(), 640);
    }
}
