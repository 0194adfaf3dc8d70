use std::{
    error::Error,
    fs::File,
    io::{self, stdin, stdout, BufWriter, Write},
    path::PathBuf,
    process,
};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pacer::{
    app::{App, FormInput, MessageKind},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    export::{write_plan, ExportFormat},
    logging::{self, LogTarget},
    preset::DistancePreset,
    runtime::{run_app, CrosstermEventSource, FixedTicker, Runner},
    PlanBuilder, PlanEditor,
};

/// progressive pacing planner for a single run
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Splits a run into equal segments, solves a linear pace progression so the splits add up to your target time, and lets you adjust individual splits by hand."
)]
pub struct Cli {
    /// total distance in km
    #[clap(short = 'd', long, conflicts_with = "preset")]
    distance: Option<f64>,

    /// race distance preset
    #[clap(short = 'p', long, value_enum)]
    preset: Option<DistancePreset>,

    /// target finish time, hours part
    #[clap(short = 'H', long)]
    hours: Option<u32>,

    /// target finish time, minutes part
    #[clap(short = 'm', long)]
    minutes: Option<u32>,

    /// km per segment (default from config, else 2)
    #[clap(short = 's', long)]
    step: Option<f64>,

    /// seconds per km each segment gets faster than the one before (default from config, else 0)
    #[clap(short = 'D', long, allow_negative_numbers = true)]
    delta: Option<f64>,

    /// override a segment pace after solving, e.g. --set 3=4:50 (segment ids start at 1)
    #[clap(long = "set", value_name = "ID=MM:SS", value_parser = parse_override)]
    overrides: Vec<PaceOverride>,

    /// output format for --print
    #[clap(short = 'f', long, value_enum, default_value_t = ExportFormat::Table)]
    format: ExportFormat,

    /// print the plan instead of opening the interactive editor
    #[clap(long)]
    print: bool,

    /// write the printed plan to a file instead of stdout
    #[clap(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// store the given --step and --delta as new defaults
    #[clap(long)]
    save_defaults: bool,

    /// config file to use instead of the platform default
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaceOverride {
    /// 1-based segment id
    id: usize,
    pace: String,
}

fn parse_override(s: &str) -> Result<PaceOverride, String> {
    let (id, pace) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=MM:SS, got '{s}'"))?;
    let id: usize = id
        .trim()
        .parse()
        .map_err(|_| format!("'{id}' is not a segment id"))?;
    if id == 0 {
        return Err("segment ids start at 1".to_string());
    }
    Ok(PaceOverride {
        id,
        pace: pace.trim().to_string(),
    })
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Command line values layered over the configured defaults.
    fn to_form(&self, cfg: &Config) -> FormInput {
        let mut form = FormInput::from_config(cfg);
        if let Some(preset) = self.preset {
            form.select_preset(preset);
        }
        if let Some(km) = self.distance {
            form.set_distance(km);
        }
        if self.hours.is_some() || self.minutes.is_some() {
            form.set_target(self.hours.unwrap_or(0), self.minutes.unwrap_or(0));
        }
        if let Some(step) = self.step {
            form.step = step.to_string();
        }
        if let Some(delta) = self.delta {
            form.delta = delta.to_string();
        }
        form
    }

    fn wants_tui(&self) -> bool {
        !self.print && stdin().is_tty() && stdout().is_tty()
    }
}

fn save_defaults(cli: &Cli, store: &FileConfigStore, cfg: &Config) -> io::Result<Config> {
    let updated = Config {
        step_distance: cli.step.unwrap_or(cfg.step_distance),
        pace_delta: cli.delta.unwrap_or(cfg.pace_delta),
        ..cfg.clone()
    };
    store.save(&updated)?;
    eprintln!("saved defaults to {}", store.path().display());
    Ok(updated)
}

fn apply_overrides(editor: &mut PlanEditor, overrides: &[PaceOverride]) -> Result<(), String> {
    for ov in overrides {
        editor
            .set_segment_pace(ov.id - 1, &ov.pace)
            .map_err(|e| format!("--set {}={}: {e}", ov.id, ov.pace))?;
    }
    Ok(())
}

fn run_print(cli: &Cli, cfg: &Config) -> Result<(), Box<dyn Error>> {
    let request = cli.to_form(cfg).to_request();
    let plan = PlanBuilder::from(request).build()?;
    if let Some(advisory) = plan.advisory() {
        eprintln!("warning: {advisory}");
    }

    let mut editor = PlanEditor::with_drift_threshold(cfg.drift_threshold_secs);
    editor.load(plan);
    apply_overrides(&mut editor, &cli.overrides)?;

    match &cli.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_plan(&editor, cli.format, &mut out)?;
            out.flush()?;
        }
        None => write_plan(&editor, cli.format, stdout().lock())?,
    }
    Ok(())
}

fn run_tui(cli: &Cli, cfg: Config) -> Result<(), Box<dyn Error>> {
    let form = cli.to_form(&cfg);
    let mut app = App::new(cfg, form);
    if app.form.is_filled() {
        app.calculate();
        if app.editor.plan().is_some() {
            if let Err(e) = apply_overrides(&mut app.editor, &cli.overrides) {
                app.flash(MessageKind::Error, e);
            }
            app.shown_totals = app.editor.recompute_totals();
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = run_app(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(result?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let tui = cli.wants_tui();

    logging::init(if tui {
        LogTarget::File(AppDirs::log_path())
    } else {
        LogTarget::Stderr
    })?;

    let store = cli.config_store();
    let mut cfg = store.load();
    if cli.save_defaults {
        cfg = save_defaults(&cli, &store, &cfg)?;
    }

    if tui {
        return run_tui(&cli, cfg);
    }

    if let Err(e) = run_print(&cli, &cfg) {
        eprintln!("error: {e}");
        process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["pacer"]);

        assert_eq!(cli.distance, None);
        assert_eq!(cli.preset, None);
        assert_eq!(cli.hours, None);
        assert_eq!(cli.minutes, None);
        assert_eq!(cli.step, None);
        assert_eq!(cli.delta, None);
        assert!(cli.overrides.is_empty());
        assert_eq!(cli.format, ExportFormat::Table);
        assert!(!cli.print);
        assert!(!cli.save_defaults);
    }

    #[test]
    fn test_cli_plan_inputs() {
        let cli = Cli::parse_from([
            "pacer", "-d", "10", "-H", "0", "-m", "50", "-s", "1", "-D", "3",
        ]);
        assert_eq!(cli.distance, Some(10.0));
        assert_eq!(cli.hours, Some(0));
        assert_eq!(cli.minutes, Some(50));
        assert_eq!(cli.step, Some(1.0));
        assert_eq!(cli.delta, Some(3.0));

        let cli = Cli::parse_from(["pacer", "--distance", "21.1", "--minutes", "95"]);
        assert_eq!(cli.distance, Some(21.1));
        assert_eq!(cli.minutes, Some(95));
    }

    #[test]
    fn test_cli_negative_delta() {
        let cli = Cli::parse_from(["pacer", "--delta", "-4"]);
        assert_eq!(cli.delta, Some(-4.0));
    }

    #[test]
    fn test_cli_preset() {
        let cli = Cli::parse_from(["pacer", "-p", "half"]);
        assert_eq!(cli.preset, Some(DistancePreset::Half));

        let cli = Cli::parse_from(["pacer", "--preset", "10k"]);
        assert_eq!(cli.preset, Some(DistancePreset::TenK));
    }

    #[test]
    fn test_cli_preset_conflicts_with_distance() {
        let result = Cli::try_parse_from(["pacer", "-p", "5k", "-d", "7"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["pacer", "--set", "1=5:10", "--set", "3=4:50"]);
        assert_eq!(
            cli.overrides,
            vec![
                PaceOverride {
                    id: 1,
                    pace: "5:10".into()
                },
                PaceOverride {
                    id: 3,
                    pace: "4:50".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_override_errors() {
        assert!(parse_override("5:10").is_err());
        assert!(parse_override("x=5:10").is_err());
        assert!(parse_override("0=5:10").is_err());
    }

    #[test]
    fn test_cli_format() {
        let cli = Cli::parse_from(["pacer", "-f", "json"]);
        assert_eq!(cli.format, ExportFormat::Json);
        let cli = Cli::parse_from(["pacer", "--format", "csv"]);
        assert_eq!(cli.format, ExportFormat::Csv);
    }

    #[test]
    fn test_to_form_layers_cli_over_config() {
        let cfg = Config {
            step_distance: 1.0,
            pace_delta: 2.0,
            default_preset: Some(DistancePreset::Marathon),
            ..Config::default()
        };

        let cli = Cli::parse_from(["pacer"]);
        let form = cli.to_form(&cfg);
        assert_eq!(form.distance, "42.195");
        assert_eq!(form.step, "1");
        assert_eq!(form.delta, "2");

        let cli = Cli::parse_from(["pacer", "-d", "12", "-m", "60", "-D", "0"]);
        let form = cli.to_form(&cfg);
        assert_eq!(form.distance, "12");
        assert_eq!(form.preset, None);
        assert_eq!(form.hours, "0");
        assert_eq!(form.minutes, "60");
        assert_eq!(form.delta, "0");
    }

    #[test]
    fn test_apply_overrides_reports_bad_segment() {
        let mut editor = PlanEditor::new();
        editor.load(PlanBuilder::new(10.0, 3000.0).build().unwrap());

        apply_overrides(
            &mut editor,
            &[PaceOverride {
                id: 5,
                pace: "4:30".into(),
            }],
        )
        .unwrap();
        assert_eq!(editor.segments()[4].pace, 270.0);

        let err = apply_overrides(
            &mut editor,
            &[PaceOverride {
                id: 6,
                pace: "4:30".into(),
            }],
        )
        .unwrap_err();
        assert!(err.starts_with("--set 6=4:30:"));
    }
}
