//! Vision Tester CLI - probe a local inference server and run vision tests
//!
//! Usage:
//!     vision-tester [OPTIONS]
//!
//! Environment Variables:
//!     VISION_TESTER_BASE_URL: Inference server URL (default: http://localhost:11434)
//!     VISION_TESTER_MODEL: Model name (default: llava, or the first advertised vision model)
//!     VISION_TESTER_GENERATE_TIMEOUT: Generate timeout in seconds (default: 60);
//!         --timeout takes precedence
//!     VISION_TESTER_LIST_TIMEOUT: Model listing timeout in seconds (default: 5)
//!     VISION_TESTER_REPORT_DIR: Directory to save result reports

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vision_tester::{
    spawn_generate, write_test_images, ClientError, ConnectionReport, ImagePayload,
    InferenceClient, PromptStyle, ReportSaver, ServerEndpoint, TestReport, VisionTest,
    TIMING_CONFIG,
};

const DEFAULT_MODEL: &str = "llava";

/// Vision Tester - test the vision capabilities of locally hosted models
#[derive(Parser, Debug)]
#[command(name = "vision-tester")]
#[command(about = "Vision Tester - test the vision capabilities of locally hosted models")]
#[command(after_help = r#"Examples:
    # Check the server and list its models
    vision-tester --list-models

    # Run every built-in test against an image
    vision-tester --image photo.png --test all

    # Brief prompts with a specific model and a longer timeout
    vision-tester --image photo.png --test color --style brief --model llava:13b --timeout 120

    # Ask your own question
    vision-tester --image photo.png --prompt "How many people are in this picture?"

    # Interactive mode (type prompts, or color/shape/general)
    vision-tester --image photo.png

    # Generate synthetic test images
    vision-tester --generate-test-images test_images
"#)]
struct Cli {
    // Server options
    /// Inference server base URL
    #[arg(long, env = "VISION_TESTER_BASE_URL", default_value = "http://localhost:11434")]
    base_url: String,

    /// Model name
    #[arg(long, env = "VISION_TESTER_MODEL")]
    model: Option<String>,

    /// Generate timeout in seconds [default: VISION_TESTER_GENERATE_TIMEOUT or 60]
    #[arg(long)]
    timeout: Option<f64>,

    /// List the server's models and exit
    #[arg(long)]
    list_models: bool,

    // Test options
    /// Image to analyze (jpg, png, bmp, gif, tiff)
    #[arg(short = 'i', long, value_name = "PATH")]
    image: Option<String>,

    /// Built-in test to run
    #[arg(short = 't', long, value_parser = ["color", "shape", "general", "all"])]
    test: Option<String>,

    /// Custom prompt to send with the image
    #[arg(short = 'p', long, conflicts_with = "test")]
    prompt: Option<String>,

    /// Wording of the built-in prompts
    #[arg(long, default_value = "detailed", value_parser = ["detailed", "brief"])]
    style: String,

    /// Directory to save each result as a text report
    #[arg(long, env = "VISION_TESTER_REPORT_DIR", value_name = "DIR")]
    report_dir: Option<String>,

    /// Write the synthetic color, shape and complex test images and exit
    #[arg(long, value_name = "DIR")]
    generate_test_images: Option<String>,

    // Other options
    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Everything a test run needs, owned by the caller rather than the client
struct Session {
    client: InferenceClient,
    endpoint: ServerEndpoint,
    model: String,
    image: Arc<ImagePayload>,
    style: PromptStyle,
    timeout: Duration,
    saver: Option<ReportSaver>,
}

impl Session {
    async fn run_test(&mut self, test: VisionTest) -> Result<()> {
        self.run_prompt(test.name(), test.prompt(self.style)).await
    }

    async fn run_prompt(&mut self, test_name: &str, prompt: &str) -> Result<()> {
        println!("Running {}...", test_name);

        let pending = spawn_generate(
            &self.client,
            self.endpoint.clone(),
            self.model.clone(),
            prompt.to_string(),
            Arc::clone(&self.image),
            self.timeout,
        );
        let outcome = pending.wait().await;

        let report = TestReport::new(test_name, &self.model, &outcome);
        println!("\n{}\n", report.render());

        if let Some(saver) = self.saver.as_mut() {
            let path = saver.save(&report).await?;
            println!("Saved report: {}\n", path.display());
        }

        Ok(())
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Check that the server answers and report its models
async fn check_server(client: &InferenceClient, endpoint: &ServerEndpoint) -> Option<ConnectionReport> {
    println!("\u{1F50D} Checking inference server...");
    println!("{}", "-".repeat(50));

    print!("1. Checking connectivity ({})... ", endpoint);
    io::stdout().flush().ok();

    match client.check_connection(endpoint).await {
        Ok(report) => {
            println!("\u{2705} OK");
            if report.is_empty() {
                println!("   Warning: No models found. Pull one first: ollama pull llava");
            } else {
                println!("   Found {} total models", report.models.len());
                let vision: Vec<&str> = report.vision_models().map(|m| m.name.as_str()).collect();
                if vision.is_empty() {
                    println!("   No obvious vision models detected, but you can try any model");
                } else {
                    println!("   Likely vision models: {}", vision.join(", "));
                }
            }
            println!("{}", "-".repeat(50));
            println!("\u{2705} Server checks passed!\n");
            Some(report)
        }
        Err(e) => {
            println!("\u{274C} FAILED");
            match &e {
                ClientError::Unreachable { .. } => {
                    println!("   Error: Cannot connect to {}", endpoint);
                    println!("   Details: {}", e);
                    println!("   Solution:");
                    println!("     1. Check if the server is running: ollama serve");
                    println!("     2. Verify the base URL is correct");
                    println!("     3. Try: curl {}", endpoint.tags_url());
                }
                ClientError::ServerRejected { .. } | ClientError::ProtocolViolation { .. } => {
                    println!("   {}", e.user_message());
                    println!("   Solution: Make sure {} is an Ollama-compatible server", endpoint);
                }
            }
            println!("{}", "-".repeat(50));
            println!("\u{274C} Server check failed. Please fix the issues above.");
            None
        }
    }
}

/// Pick the model to use when none was given explicitly
fn choose_model(requested: Option<&str>, report: &ConnectionReport) -> String {
    if let Some(model) = requested {
        if !report.is_empty() && !report.models.iter().any(|m| m.name == model) {
            println!(
                "\u{26A0}\u{FE0F}  Model '{}' is not advertised by the server; trying it anyway.\n",
                model
            );
        }
        return model.to_string();
    }

    report
        .models
        .iter()
        .find(|m| m.base_name() == DEFAULT_MODEL)
        .or_else(|| report.vision_models().next())
        .or_else(|| report.models.first())
        .map(|m| m.name.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// Print the server's models and return whether the listing succeeded
async fn print_models(client: &InferenceClient, endpoint: &ServerEndpoint) -> bool {
    match client.check_connection(endpoint).await {
        Ok(report) if report.is_empty() => {
            println!("No models found. Make sure to pull a model first: ollama pull llava");
            true
        }
        Ok(report) => {
            println!("Models on {}:", endpoint);
            println!("{}", "-".repeat(60));
            for model in &report.models {
                let icon = if model.is_vision_capable {
                    "\u{1F441}\u{FE0F} "
                } else {
                    "  "
                };
                println!("  {} {}", icon, model.name);
            }
            println!("{}", "-".repeat(60));
            println!(
                "{} models, {} likely vision",
                report.models.len(),
                report.vision_models().count()
            );
            true
        }
        Err(e) => {
            println!("Connection failed: {}", e.user_message());
            false
        }
    }
}

/// Print application header
fn print_header(session: &Session, image_path: &str) {
    let info = session.image.info();

    println!("{}", "=".repeat(50));
    println!("Vision Tester - local vision model tests");
    println!("{}", "=".repeat(50));
    println!("Server: {}", session.endpoint);
    println!("Model: {}", session.model);
    println!("Timeout: {}s", session.timeout.as_secs_f64());
    println!("Prompt Style: {:?}", session.style);
    println!("Image: {}", image_path);
    println!(
        "  Format: {}",
        info.format
            .map(|f| format!("{:?}", f))
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!("  Size: {}x{}", info.width, info.height);
    println!("  Mode: {}", info.mode);

    if let Some(saver) = &session.saver {
        println!("Report Dir: {}", saver.dir().display());
    }

    println!("{}", "=".repeat(50));
}

/// Run interactive mode
async fn run_interactive_mode(session: &mut Session) -> Result<()> {
    println!("\nEntering interactive mode. Type 'quit' to exit.");
    println!("Type 'color', 'shape' or 'general' for a built-in test, or any question.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("Enter a prompt: ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(_) => {
                println!("\n\nInterrupted. Goodbye!");
                break;
            }
        }

        let prompt = input.trim();

        if prompt.eq_ignore_ascii_case("quit")
            || prompt.eq_ignore_ascii_case("exit")
            || prompt.eq_ignore_ascii_case("q")
        {
            println!("Goodbye!");
            break;
        }

        if prompt.is_empty() {
            continue;
        }

        println!();
        match prompt.parse::<VisionTest>() {
            Ok(test) => session.run_test(test).await?,
            Err(_) => session.run_prompt("Custom Prompt", prompt).await?,
        }
    }

    Ok(())
}

/// Parse the --test value into the tests to run
fn parse_tests(test: &str) -> Result<Vec<VisionTest>> {
    if test.eq_ignore_ascii_case("all") {
        return Ok(VisionTest::ALL.to_vec());
    }
    test.parse::<VisionTest>()
        .map(|t| vec![t])
        .map_err(|e| anyhow!(e))
}

fn parse_timeout(secs: Option<f64>) -> Result<Duration> {
    match secs {
        None => Ok(TIMING_CONFIG.generate_timeout),
        Some(s) if s > 0.0 => {
            Duration::try_from_secs_f64(s).map_err(|e| anyhow!("Invalid timeout {}: {}", s, e))
        }
        Some(s) => Err(anyhow!("Invalid timeout: {}", s)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    init_logging(args.verbose, args.quiet);
    debug!("Parsed arguments: {:?}", args);

    // Handle --generate-test-images (no server needed)
    if let Some(dir) = &args.generate_test_images {
        let paths = write_test_images(dir)
            .with_context(|| format!("Failed to write test images to {}", dir))?;
        for path in paths {
            println!("Created test image: {}", path.display());
        }
        println!("\nTest images generated successfully!");
        return Ok(());
    }

    let endpoint = ServerEndpoint::parse(&args.base_url)?;
    let client = InferenceClient::new();

    // Handle --list-models
    if args.list_models {
        if !print_models(&client, &endpoint).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    let Some(image_path) = args.image.as_deref() else {
        println!("Please select an image first: vision-tester --image <PATH>");
        std::process::exit(2);
    };

    let style: PromptStyle = args.style.parse().map_err(|e: String| anyhow!(e))?;
    let timeout = parse_timeout(args.timeout)?;
    let tests = args.test.as_deref().map(parse_tests).transpose()?;

    let image = ImagePayload::open(Path::new(image_path))
        .with_context(|| format!("Failed to load image: {}", image_path))?;

    // Check the server before sending anything
    let Some(report) = check_server(&client, &endpoint).await else {
        std::process::exit(1);
    };

    let saver = match &args.report_dir {
        Some(dir) => Some(ReportSaver::new(dir).await?),
        None => None,
    };

    let mut session = Session {
        model: choose_model(args.model.as_deref(), &report),
        client,
        endpoint,
        image: Arc::new(image),
        style,
        timeout,
        saver,
    };

    print_header(&session, image_path);
    println!();

    if let Some(prompt) = &args.prompt {
        session.run_prompt("Custom Prompt", prompt).await?;
    } else if let Some(tests) = tests {
        for test in tests {
            session.run_test(test).await?;
        }
    } else {
        run_interactive_mode(&mut session).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vision_tester::ModelDescriptor;

    fn report(names: &[&str]) -> ConnectionReport {
        ConnectionReport {
            models: names.iter().map(|n| ModelDescriptor::new(*n)).collect(),
        }
    }

    #[test]
    fn test_choose_model_prefers_default() {
        let report = report(&["mistral", "moondream", "llava:7b"]);
        assert_eq!(choose_model(None, &report), "llava:7b");
    }

    #[test]
    fn test_choose_model_falls_back_to_vision_then_first() {
        assert_eq!(choose_model(None, &report(&["mistral", "moondream"])), "moondream");
        assert_eq!(choose_model(None, &report(&["mistral", "phi3"])), "mistral");
        assert_eq!(choose_model(None, &report(&[])), "llava");
    }

    #[test]
    fn test_choose_model_keeps_explicit_choice() {
        let report = report(&["llava"]);
        assert_eq!(choose_model(Some("bakllava"), &report), "bakllava");
    }

    #[test]
    fn test_parse_tests() {
        assert_eq!(parse_tests("all").unwrap(), VisionTest::ALL.to_vec());
        assert_eq!(parse_tests("shape").unwrap(), vec![VisionTest::Shape]);
        assert!(parse_tests("texture").is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(Some(120.0)).unwrap(), Duration::from_secs(120));
        assert!(parse_timeout(Some(0.0)).is_err());
        assert!(parse_timeout(Some(1e20)).is_err());
        assert!(parse_timeout(Some(f64::INFINITY)).is_err());
        assert!(parse_timeout(Some(f64::NAN)).is_err());
        assert_eq!(parse_timeout(None).unwrap(), TIMING_CONFIG.generate_timeout);
    }

    #[test]
    fn test_timeout_flag_has_no_env_of_its_own() {
        use clap::CommandFactory;

        let command = Cli::command();
        let timeout = command
            .get_arguments()
            .find(|arg| arg.get_id() == "timeout")
            .unwrap();
        // The env fallback lives in TIMING_CONFIG only
        assert!(timeout.get_env().is_none());

        let cli = Cli::try_parse_from(["vision-tester", "--image", "photo.png"]).unwrap();
        assert_eq!(cli.timeout, None);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "vision-tester",
            "--image",
            "photo.png",
            "--test",
            "all",
            "--style",
            "brief",
        ])
        .unwrap();
        assert_eq!(cli.image.as_deref(), Some("photo.png"));
        assert_eq!(cli.test.as_deref(), Some("all"));
        assert_eq!(cli.style, "brief");

        assert!(Cli::try_parse_from(["vision-tester", "--test", "color", "--prompt", "hi"]).is_err());
    }
}
