//! `twin persona`: show the system prompt the server would use.

use anyhow::Result;
use console::style;

use twin_infra::persona::load_persona;
use twin_types::config::TwinConfig;

pub async fn show_persona(config: &TwinConfig, json: bool) -> Result<()> {
    let persona = load_persona(&config.persona).await;

    if json {
        let out = serde_json::json!({
            "prompt": persona.prompt(),
            "missing": persona.missing(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", persona.prompt());

    if !persona.missing().is_empty() {
        eprintln!();
        eprintln!(
            "  {} Placeholders used for: {}",
            style("!").yellow().bold(),
            style(persona.missing().join(", ")).yellow()
        );
    }
    Ok(())
}
