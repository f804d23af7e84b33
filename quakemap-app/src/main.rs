use anyhow::Context;
use clap::Parser;
use quakemap::{
    core::config::{AppConfig, CONFIG_PATH_ENV},
    pipeline::{AppContext, RenderPipeline},
    rendering::context::RenderContext,
    runtime,
    ui::widget::MapView,
};
use std::path::PathBuf;

/// Earthquakes of the past week over tectonic plate boundaries
#[derive(Debug, Parser)]
#[command(name = "quakemap-app", version, about)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Load both feeds, print a summary and exit without opening a window
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    let context = AppContext::new(config).context("building map")?;

    if args.headless {
        return run_headless(&context).await;
    }

    let pipeline = RenderPipeline::new(&context);
    let _pipeline_task = runtime::spawn(async move {
        pipeline.run().await;
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquakes and tectonic plates"),
        ..Default::default()
    };

    let view = MapView::new(context.map.clone());
    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(move |_cc| Box::new(QuakemapApp { view })),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))?;

    Ok(())
}

/// Loads both feeds, renders one frame and prints a summary
async fn run_headless(context: &AppContext) -> anyhow::Result<()> {
    let report = RenderPipeline::new(context).run().await;
    println!("earthquakes: {}", report.earthquakes);
    println!("plates: {}", report.plates);

    let mut map = context
        .map
        .lock()
        .map_err(|_| anyhow::anyhow!("map lock poisoned"))?;
    let size = map.viewport().size;
    let mut frame = RenderContext::new(size.x as u32, size.y as u32);
    map.render(&mut frame)?;
    println!(
        "frame: {} circles, {} lines, {} tiles",
        frame.circles().count(),
        frame.lines().count(),
        frame.tiles().count()
    );
    if let Some(legend) = map.legend() {
        println!("{}", legend.to_html());
    }
    Ok(())
}

struct QuakemapApp {
    view: MapView,
}

impl eframe::App for QuakemapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.view.show(ui);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from(["quakemap-app", "-c", "quakes.json", "--headless"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("quakes.json")));
        assert!(args.headless);

        assert!(Args::try_parse_from(["quakemap-app", "--verbose"]).is_err());
    }
}
