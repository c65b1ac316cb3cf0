use std::io::Write;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use evo_persona::cli::Args;
use evo_persona::gateway::GatewayClient;
use evo_persona::poller::EventPoller;
use evo_persona::render::TerminalRenderer;
use evo_persona::session::{SessionController, WELCOME_MESSAGE};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let gateway = GatewayClient::builder(&args.base_url)
        .poll_interval(Duration::from_secs(args.poll_interval))
        .build();

    let mut controller = SessionController::new(gateway.clone(), TerminalRenderer::new());

    println!("{} {}", "ai  ▸".green().bold(), WELCOME_MESSAGE);
    controller.load_initial_status().await;

    // Event polling runs independently of user interaction; its output
    // overlays the chat as non-blocking notifications.
    let poller = EventPoller::new(gateway);
    let _poll_task = tokio::spawn(async move {
        let mut overlay = TerminalRenderer::new();
        poller
            .run(move |effect| {
                use evo_persona::session::EffectSink;
                overlay.handle(effect);
            })
            .await;
    });

    if args.demo {
        controller.start_demo().await;
    }
    if args.quick_evolve {
        controller.quick_evolution_test().await;
    }
    if let Some(message) = &args.message {
        controller.send_message(message).await;
    }

    println!(
        "{}",
        "type a message, or /status /reset /demo /quit  (#memory tags a memory)".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" | "/exit" => break,
            "/status" => controller.toggle_status_panel(),
            "/demo" => controller.start_demo().await,
            "/reset" => {
                prompt("Reset conversation? All memories and evolution progress will be lost. [y/N] ")?;
                let confirmed = matches!(
                    lines.next_line().await?.as_deref().map(str::trim),
                    Some("y") | Some("Y") | Some("yes")
                );
                controller.reset_conversation(confirmed).await;
            }
            "" => {}
            text => {
                controller.input_changed(text);
                controller.send_message(text).await;
            }
        }
    }

    Ok(())
}

fn prompt(text: &str) -> std::io::Result<()> {
    print!("{text}");
    std::io::stdout().flush()
}
