use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use mandelfpga::{FractalView, PixelRecord, UsbConfig, UsbSession, DEFAULT_BYTE_WIDTH};
use mandelfpga_render::{frame, open_image, plot, Histogram};

/// Drive the FPGA Mandelbrot renderer over USB
#[derive(Parser)]
#[command(name = "mandelfpga", version, about)]
struct CliArgs {
    #[command(subcommand)]
    command: Option<CliCommand>,

    /// USB vendor id (hex)
    #[arg(long, value_parser = parse_usb_id, default_value = "1209")]
    vid: u16,

    /// USB product id (hex)
    #[arg(long, value_parser = parse_usb_id, default_value = "deca")]
    pid: u16,

    /// Width in bytes of each fixed-point field in the command
    #[arg(long, default_value_t = DEFAULT_BYTE_WIDTH)]
    byte_width: usize,

    /// Viewport to render [default: legacy, or default for png]
    #[arg(long, value_enum)]
    view: Option<ViewName>,

    /// Where rendered images are written
    #[arg(long, default_value = "mandelbrot.png")]
    out: PathBuf,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Render and open the result in the image viewer
    Gui,

    /// Render at a high iteration cap and plot the points inside the set
    Plot {
        /// Where the scatter plot is written
        #[arg(long, default_value = "plot.png")]
        plot_out: PathBuf,
    },

    /// Render the view at a given size to a PNG
    Png {
        #[arg(requires = "height")]
        width: Option<u16>,

        #[arg(requires = "width")]
        height: Option<u16>,

        /// Iteration cap, the view's own when omitted
        #[arg(requires = "height")]
        iterations: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewName {
    Default,
    Swirl,
    Legacy,
}

impl ViewName {
    fn view(self) -> FractalView {
        match self {
            ViewName::Default => FractalView::default_view(),
            ViewName::Swirl => FractalView::swirl(),
            ViewName::Legacy => FractalView::legacy(),
        }
    }
}

impl CliArgs {
    /// The view this invocation renders, with any size or iteration
    /// overrides applied.
    fn planned_view(&self) -> FractalView {
        let fallback = match self.command {
            Some(CliCommand::Png { .. }) => ViewName::Default,
            _ => ViewName::Legacy,
        };
        let view = self.view.unwrap_or(fallback).view();

        match self.command {
            None => view,
            Some(CliCommand::Gui) => view.with_iterations(256),
            Some(CliCommand::Plot { .. }) => view.with_iterations(2048),
            Some(CliCommand::Png {
                width: Some(width),
                height: Some(height),
                iterations,
            }) => {
                let mut view = view;
                let iterations = iterations.unwrap_or(view.max_iterations);
                view.resize(width, height, iterations);
                view
            }
            Some(CliCommand::Png { .. }) => view,
        }
    }
}

fn parse_usb_id(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("bad usb id {:?}: {}", s, e))
}

fn render(
    session: &mut UsbSession,
    view: &FractalView,
    byte_width: usize,
) -> Result<Vec<PixelRecord>, Box<dyn Error>> {
    info!("{}", view);
    let (llx, lly) = view.lower_left();
    let (urx, ury) = view.upper_right();
    info!("lower left corner: x: {} y: {}", llx, lly);
    info!("upper right corner: x: {} y: {}", urx, ury);

    Ok(session.render(&view.request(), byte_width)?)
}

fn debug_render(
    session: &mut UsbSession,
    view: &FractalView,
    byte_width: usize,
) -> Result<(), Box<dyn Error>> {
    let raw = session.render_raw(&view.request(), byte_width)?;
    info!("got total: {}", raw.len());

    let pixels = mandelfpga::decode_frame(&raw);
    for pixel in &pixels {
        debug!(
            "x: {} y: {} iterations: {}\t escape: {} maxed: {}",
            pixel.x,
            pixel.y,
            pixel.iterations,
            pixel.status.escaped(),
            pixel.status.maxed()
        );
    }

    info!("total number of pixels: {}", pixels.len());

    Ok(())
}

fn render_png(
    session: &mut UsbSession,
    view: &FractalView,
    byte_width: usize,
    out: &Path,
) -> Result<(), Box<dyn Error>> {
    let pixels = render(session, view, byte_width)?;
    debug!("{:?}", Histogram::of(&pixels).buckets);

    let image = frame::render_image(&pixels, view.width.into(), view.height.into());
    frame::save_png(&image, out)?;
    open_image(out);

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    let level = if args.command.is_none() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = UsbConfig {
        vendor_id: args.vid,
        product_id: args.pid,
        ..UsbConfig::default()
    };

    let mut session = UsbSession::connect(config)?;
    let view = args.planned_view();

    match args.command {
        None => debug_render(&mut session, &view, args.byte_width)?,
        Some(CliCommand::Gui) | Some(CliCommand::Png { .. }) => {
            render_png(&mut session, &view, args.byte_width, &args.out)?;
        }
        Some(CliCommand::Plot { plot_out }) => {
            let pixels = render(&mut session, &view, args.byte_width)?;

            let points = plot::maxed_points(&pixels, &view);
            info!("{} points inside the set", points.len());

            let image =
                plot::scatter_image(&points, &view, view.width.into(), view.height.into());
            frame::save_png(&image, &plot_out)?;
            open_image(&plot_out);

            plot::inspect(&points, &view, io::stdin().lock(), io::stdout())?;
        }
    }

    session.close();

    Ok(())
}
