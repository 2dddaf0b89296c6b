//! Binary entry point.

use clap::Parser;

use fo::adapter::{self, AdapterRegistry};
use fo::cli::{Args, Mode, ShowOutput};
use fo::process::{self, BufferBudget, PipeMode, DEFAULT_MAX_BUFFER_SIZE};
use fo::render::{self, BoxLayout};
use fo::task::{ResolvedOutput, Task};
use fo::theme::{self, ResolveOptions};

#[tokio::main]
async fn main() {
    fo::debug::init();
    let args = Args::parse();
    let exit_code = run(args).await;
    std::process::exit(exit_code);
}

async fn run(args: Args) -> i32 {
    let theme = theme::resolve_options(ResolveOptions {
        requested_name: &args.theme,
        monochrome: args.monochrome,
        ci: args.ci,
        show_timer: true,
        inline_progress: matches!(args.mode, Mode::Stream),
        use_boxes: true,
    });

    let (command, command_args) = args.command_and_args();
    if command.is_empty() {
        eprintln!("fo: no command given");
        return 2;
    }

    let mut task = Task::new(
        command,
        command,
        command_args.to_vec(),
        format!("running {command}"),
        theme.clone(),
    );

    let pipe_mode = match args.mode {
        Mode::Stream => PipeMode::Stream,
        Mode::Capture => PipeMode::Capture,
    };

    let budget = BufferBudget::new(DEFAULT_MAX_BUFFER_SIZE);
    let run_result = process::run(&mut task, budget, pipe_mode).await;
    let is_startup_failure = matches!(run_result, Err(fo::error::ProcessError::StartupFailure(_)));
    let exit_code = match run_result {
        Ok(code) => code,
        Err(_) => task.exit_code.unwrap_or(1),
    };

    if !is_startup_failure {
        let registry = AdapterRegistry::with_builtins();
        adapter::apply_to_task(&registry, &task);
    }

    let show_block = !is_startup_failure
        && match args.show_output {
            ShowOutput::Always => true,
            ShowOutput::Never => false,
            ShowOutput::OnFail => exit_code != 0,
        };

    let body = if show_block {
        match task.resolved_output() {
            ResolvedOutput::Pattern { pattern, .. } => pattern.render(&theme),
            ResolvedOutput::Lines(lines) => {
                let rendered: Vec<&str> = lines
                    .iter()
                    .filter(|l| !l.context.is_internal)
                    .map(|l| l.content.as_str())
                    .collect();
                rendered.join("\n") + "\n"
            }
        }
    } else {
        String::new()
    };

    let terminal_width = crossterm::terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
    let layout = BoxLayout::derive(terminal_width, &theme);
    let rendered = render::render_box(&task.label, &body, layout, &theme);
    print!("{rendered}");

    if args.json {
        let export = fo::export::export_task(&task, std::time::Instant::now(), chrono::Utc::now());
        if let Ok(json) = fo::export::to_json_string(&export) {
            println!("{json}");
        }
    }

    exit_code
}
