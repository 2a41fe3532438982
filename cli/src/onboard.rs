use anyhow::Result;
use console::style;
use dialoguer::Input;
use support_core::config::Config;

const BANNER: &str = r"
    -----------------------------------
      support - headphones help desk
    -----------------------------------
";

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", BANNER);

    let mut config = Config::default();

    print_step(1, 2, "Credentials");
    println!("Leave blank to read ANTHROPIC_API_KEY from the environment at run time.");
    let api_key: String = Input::new()
        .with_prompt("Anthropic API key")
        .allow_empty(true)
        .interact_text()?;
    config.api_key = api_key.trim().to_string();

    print_step(2, 2, "Model");
    let model: String = Input::new()
        .with_prompt("Model")
        .default(config.model.clone())
        .interact_text()?;
    config.model = model.trim().to_string();

    Ok(config)
}
