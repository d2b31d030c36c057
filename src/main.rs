//! Imagen - `OpenAI` image generation CLI.

use std::path::Path;
use std::process;

use clap::Parser;

use imagen_openai::cli::Cli;
use imagen_openai::config::{self, Config};
use imagen_openai::context::ServiceContext;
use imagen_openai::error::{ExitCode, ImageError};
use imagen_openai::logging;
use imagen_openai::model::{effective_response_format, resolve_model};
use imagen_openai::models::{ImageGeneration, ImageGenerationRequest};
use imagen_openai::output::{decode_image, resolve_output_path, save_image, sniff_extension};
use imagen_openai::params::{aspect_ratio_to_size, parse_response_format, parse_size};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(ExitCode::from(&e).as_i32());
    }
}

async fn run(cli: Cli) -> Result<(), ImageError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(ImageError::Config)?;
    logging::init(cli.verbose, &config.logging);

    let prompt = cli.resolve_prompt()?;
    let request = build_request(&cli, &config, prompt)?;
    tracing::debug!(model = %request.model, size = request.size.as_str(), "request resolved");

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("IMAGEN_REPLAY").ok();
    let is_recording = std::env::var("IMAGEN_REC")
        .is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!(cassette = %cassette_path, "replaying broker interactions");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording broker interactions");
        let (ctx, session) = ServiceContext::recording(&config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config)?, None)
    };

    let result = ctx
        .image_generations
        .generate_image(ImageGeneration::new(request))
        .await;
    drop(ctx);

    // Finish recording before reporting, so failed calls are captured too
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    emit_results(&cli, &result?)
}

fn build_request(
    cli: &Cli,
    config: &Config,
    prompt: String,
) -> Result<ImageGenerationRequest, ImageError> {
    let model = resolve_model(cli.model.as_deref().unwrap_or(&config.defaults.model));

    let size = match (&cli.size, &cli.aspect_ratio) {
        (Some(size), _) => parse_size(size),
        (None, Some(ratio)) => aspect_ratio_to_size(ratio, &model),
        (None, None) => parse_size(&config.defaults.size),
    }
    .map_err(ImageError::InvalidArgument)?;

    // An explicit format goes to the validator as-is; only the default adapts to the model.
    let response_format = match cli.response_format.as_deref() {
        Some(explicit) => parse_response_format(explicit),
        None => parse_response_format(&config.defaults.response_format)
            .map(|default| effective_response_format(default, &model)),
    }
    .map_err(ImageError::InvalidArgument)?;

    Ok(ImageGenerationRequest {
        prompt,
        model,
        images_count: cli.count,
        size,
        response_format,
        user: cli.user.clone(),
    })
}

fn emit_results(cli: &Cli, generation: &ImageGeneration) -> Result<(), ImageError> {
    let Some(response) = generation.response.as_ref() else {
        return Ok(());
    };
    let total = response.results.len();

    for (i, result) in response.results.iter().enumerate() {
        if let Some(ref revised) = result.revised_prompt {
            tracing::info!(index = i, revised_prompt = %revised, "prompt revised by model");
        }
        if let Some(ref url) = result.url {
            println!("{url}");
        }
        if let Some(ref encoded) = result.base64_image {
            let data = decode_image(encoded)?;
            let extension = sniff_extension(&data);
            let path = resolve_output_path(
                cli.output.as_deref(),
                &generation.request.prompt,
                extension,
                i,
                total,
            );
            save_image(&data, &path)?;
            eprintln!("Saved: {}", path.display());
        }
    }

    Ok(())
}
