//! CLI argument parsing with clap.

use clap::Parser;

/// Generate images with the `OpenAI` Images API.
#[derive(Parser, Debug)]
#[command(name = "imagen", version, about)]
pub struct Cli {
    /// Text prompt describing the desired image.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Model name or short alias (e.g. dall-e, gpt-1). Defaults to the config value.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Image size, e.g. 1024x1024, 1792x1024, auto. Defaults to the config value.
    #[arg(short, long, conflicts_with = "aspect_ratio")]
    pub size: Option<String>,

    /// Aspect ratio (e.g. 1:1, 16:9, 9:16), translated to the closest supported size.
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Response format: url or b64_json. Defaults to the config value.
    #[arg(short = 'r', long)]
    pub response_format: Option<String>,

    /// Output file path for base64 results (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of images to generate.
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u32,

    /// End-user identifier forwarded to the API.
    #[arg(short, long)]
    pub user: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output (debug logging).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither prompt nor prompt-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)
                .map(|text| text.trim_end().to_string())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string or use -p/--prompt-file",
            ))
        }
    }
}
