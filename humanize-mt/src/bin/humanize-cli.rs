use clap::{Arg, ArgAction, Command};
use fastrand::Rng;
use humanize::{InMemoryLexicon, LexicalDatabase};
use humanize_mt::{
    ErrorResponse, HumanizeConfig, HumanizeRequest, Humanizer, MachineTranslator, MockMode,
    MockTranslator, PipelineError, Tone, TranslationChain,
};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("humanize-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rewrite text through machine translation chains and perturbation stages")
        .arg(
            Arg::new("text")
                .help("Text to humanize")
                .required_unless_present("file")
                .index(1),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .help("Read the text from a file instead")
                .value_parser(clap::value_parser!(PathBuf))
                .conflicts_with("text"),
        )
        .arg(
            Arg::new("tone")
                .long("tone")
                .short('t')
                .help("standard (French round trip) or professional (Japanese round trip)")
                .default_value("standard"),
        )
        .arg(
            Arg::new("deep")
                .long("deep")
                .short('d')
                .help("Run the deep chain and perturbation stages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of Google Translate")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the random stages, for reproducible output")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full response as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every pipeline step")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .init();

    let text = match matches.get_one::<PathBuf>("file") {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => matches
            .get_one::<String>("text")
            .cloned()
            .unwrap_or_default(),
    };
    let tone = matches
        .get_one::<String>("tone")
        .map(|t| Tone::from(t.as_str()))
        .unwrap_or_default();
    let use_mock = matches.get_flag("mock");
    let as_json = matches.get_flag("json");

    let config = HumanizeConfig::load(matches.get_one::<PathBuf>("config").map(|p| p.as_path()))?;
    tracing::debug!(?config, "configuration loaded");

    let humanizer = if use_mock {
        mock_humanizer(&config)?
    } else {
        let provider = config
            .google_provider()
            .map_err(|e| format!("Failed to initialize translator: {}", e))?;
        config.build_humanizer(Arc::new(provider))?
    };

    let request = HumanizeRequest::new(text)
        .with_tone(tone)
        .with_deep_mode(matches.get_flag("deep"));
    let result = match matches.get_one::<u64>("seed") {
        Some(seed) => {
            humanizer
                .humanize_with_rng(&request, &mut Rng::with_seed(*seed))
                .await
        }
        None => humanizer.humanize(&request).await,
    };

    match result {
        Ok(response) if as_json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Ok(response) => {
            println!("{}", response.humanized);
            eprintln!();
            eprintln!("Mode: {}", response.mode);
            eprintln!("Structural changes: {}", response.structural_changes);
            eprintln!("Changed words: {}", response.changed_words);
            eprintln!("Longest unchanged: {}", response.longest_unchanged);
        }
        Err(err) => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&err))?);
            } else {
                eprintln!("Error: {}", err.public_message());
            }
            std::process::exit(if err.is_client_error() { 2 } else { 1 });
        }
    }

    Ok(())
}

/// Humanizer over a word-reversing mock; runs without a lexicon if none is configured
fn mock_humanizer(config: &HumanizeConfig) -> Result<Humanizer, PipelineError> {
    let translator: Arc<dyn MachineTranslator> = Arc::new(MockTranslator::new(MockMode::Reorder));
    if config.wordnet_dir.is_some() || config.lexicon_json.is_some() {
        return config.build_humanizer(translator);
    }

    tracing::warn!("no lexical database configured, lexical substitution disabled");
    let lexicon: Arc<dyn LexicalDatabase> = Arc::new(InMemoryLexicon::new());
    let chain = TranslationChain::new(translator, config.translate_timeout())
        .with_home_language(config.home_language.clone());
    Ok(Humanizer::new(chain, lexicon).with_settings(config.pipeline_settings()))
}
