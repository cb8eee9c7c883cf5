use anyhow::Context;
use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use reflect_assist::api::{ApiClient, ReflectionBackend};
use reflect_assist::auth::{self, AuthFlow};
use reflect_assist::config::{ClientConfig, env_keys};
use reflect_assist::els::ElsFlow;
use reflect_assist::error::ConfigError;
use reflect_assist::onboarding::OnboardingFlow;
use reflect_assist::reflection::{self, CONFIRM, ReflectionFlow, ReflectionStep};
use reflect_assist::render::{InputKind, Render, StepView};
use reflect_assist::session::Session;
use reflect_assist::wizard::{Answer, Wizard};

const USAGE: &str = "\
Usage: reflect-assist <command>

Commands:
  onboard   First-run introduction
  els       Emotional Load Test
  reflect   Write a reflection (submits it when REFLECT_API_URL is set)
  login     Sign in with a one-time code
  history   List your past reflections

While answering: /back, /restart, /quit";

/// Line-oriented stdin.
struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Terminal {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next line, or `None` at EOF.
    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        eprint!("> ");
        self.lines.next_line().await.context("reading stdin")
    }
}

fn show(view: &StepView) {
    println!("\n== {} ==", view.title);
    println!("{}", view.prompt);
    match &view.input {
        InputKind::Continue => eprintln!("(press Enter to continue)"),
        InputKind::Choice { options, skippable } => {
            print_options(options);
            if *skippable {
                eprintln!("(press Enter to skip)");
            }
        }
        InputKind::MultiChoice { options } => {
            print_options(options);
            eprintln!("(comma-separated, or press Enter for none)");
        }
        InputKind::ChoiceOrText { options } => {
            print_options(options);
            eprintln!("(or type your own text)");
        }
        InputKind::Text { .. } | InputKind::Done => {}
    }
}

fn print_options(options: &[String]) {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
}

/// Parse a reply with the current step's input kind and submit it.
fn submit_reply<F: Render>(wizard: &mut Wizard<F>, raw: &str) -> reflect_assist::Result<()> {
    let input = wizard.flow().view(wizard.current()).input;
    wizard.submit(input.parse(raw))?;
    Ok(())
}

/// Show each step and feed replies to `respond` until the flow finishes.
///
/// Returns `false` if the user quit first.
async fn run_flow<F, R>(
    terminal: &mut Terminal,
    wizard: &mut Wizard<F>,
    mut respond: R,
) -> anyhow::Result<bool>
where
    F: Render + Default,
    R: AsyncFnMut(&mut Wizard<F>, &str) -> reflect_assist::Result<()>,
{
    loop {
        show(&wizard.flow().view(wizard.current()));
        if wizard.is_finished() {
            return Ok(true);
        }

        let Some(line) = terminal.read_line().await? else {
            return Ok(false);
        };
        match line.trim() {
            "/quit" => return Ok(false),
            "/back" => {
                if let Err(e) = wizard.back() {
                    eprintln!("{}", e.user_message());
                }
            }
            "/restart" => wizard.restart(),
            raw => {
                if let Err(e) = respond(wizard, raw).await {
                    tracing::debug!(error = %e, "reply rejected");
                    eprintln!("{}", e.user_message());
                }
            }
        }
    }
}

async fn onboard(terminal: &mut Terminal, session: &mut Session) -> anyhow::Result<()> {
    let mut wizard = Wizard::<OnboardingFlow>::default();
    if run_flow(terminal, &mut wizard, async |w, raw| submit_reply(w, raw)).await? {
        wizard.flow().commit(session);
    }
    Ok(())
}

async fn els(terminal: &mut Terminal) -> anyhow::Result<()> {
    let mut wizard = Wizard::<ElsFlow>::default();
    if run_flow(terminal, &mut wizard, async |w, raw| submit_reply(w, raw)).await? {
        let result = wizard.flow().result();
        tracing::info!(
            total = result.total,
            zone = ?result.zone,
            percent = result.percent,
            "emotional load test finished"
        );
    }
    Ok(())
}

async fn reflect(
    terminal: &mut Terminal,
    backend: Option<&dyn ReflectionBackend>,
    session: &Session,
) -> anyhow::Result<()> {
    let mut wizard = Wizard::<ReflectionFlow>::default();
    let finished = run_flow(terminal, &mut wizard, async |w, raw| {
        let Some(backend) = backend else {
            return submit_reply(w, raw);
        };
        if w.current() != ReflectionStep::Confirmation {
            return submit_reply(w, raw);
        }
        let input = w.flow().view(w.current()).input;
        match input.parse(raw) {
            Answer::Choice(label) if label == CONFIRM => {
                reflection::confirm(w, backend, session).await?;
                Ok(())
            }
            answer => {
                w.submit(answer)?;
                Ok(())
            }
        }
    })
    .await?;

    if !finished {
        return Ok(());
    }
    match backend {
        Some(backend) if wizard.current() == ReflectionStep::Sent => {
            match reflection::share_link(&wizard, backend, session).await {
                Ok(link) => println!("Share link: {link}"),
                Err(e) => eprintln!("{}", e.user_message()),
            }
        }
        Some(_) => {}
        None => eprintln!("(offline: set REFLECT_API_URL to send reflections)"),
    }
    Ok(())
}

async fn login(
    terminal: &mut Terminal,
    backend: &dyn ReflectionBackend,
    session: &mut Session,
) -> anyhow::Result<()> {
    let mut wizard = Wizard::<AuthFlow>::default();
    let signed_in = run_flow(terminal, &mut wizard, async |w, raw| {
        auth::respond(w, backend, session, raw).await?;
        Ok(())
    })
    .await?;

    if signed_in {
        if let Some(token) = session.auth_token() {
            eprintln!(
                "To stay signed in, export REFLECT_AUTH_TOKEN={}",
                token.expose_secret()
            );
        }
    }
    Ok(())
}

async fn history(backend: &dyn ReflectionBackend, session: &Session) -> anyhow::Result<()> {
    if !session.is_signed_in() {
        anyhow::bail!("not signed in; run `reflect-assist login` first");
    }
    let reflections = backend
        .reflection_history(session)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if reflections.is_empty() {
        println!("No reflections yet.");
    }
    for r in reflections {
        let when = r
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let intent = r.intent.map(|i| i.to_string()).unwrap_or_default();
        println!("{when:10}  {intent:10}  {}", r.recipient_name);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = std::env::args().nth(1) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let mut session = Session::new(config.token_cookie.clone());
    if let Some(token) = &config.auth_token {
        session.set_auth_token(token.expose_secret());
    }
    let client = match config.api_url {
        Some(_) => Some(ApiClient::new(&config)?),
        None => None,
    };
    let backend = client.as_ref().map(|c| c as &dyn ReflectionBackend);

    let mut terminal = Terminal::new();
    match command.as_str() {
        "onboard" => onboard(&mut terminal, &mut session).await,
        "els" => els(&mut terminal).await,
        "reflect" => reflect(&mut terminal, backend, &session).await,
        "login" | "history" => {
            let Some(backend) = backend else {
                return Err(ConfigError::MissingEnvVar(env_keys::API_URL.to_string()).into());
            };
            if command == "login" {
                login(&mut terminal, backend, &mut session).await
            } else {
                history(backend, &session).await
            }
        }
        "help" | "-h" | "--help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}\n\n{USAGE}");
            std::process::exit(2);
        }
    }
}
