use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use tracing::info;
use trellis_core::vault::Vault;
use trellis_extensions::relations::{
    status_behavior_parse, RelationSettings, RelationsSettings, StatusBehavior,
};

use crate::app::Trellis;
use crate::cli::{InfoArgs, InitArgs, OpenArgs, RelationArgs, RelationCommands};

// --- Handler Functions ---

pub async fn handle_init(args: InitArgs) -> Result<()> {
    let target = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    info!("Creating vault at: {}", target.display());
    let vault = Vault::create(&target).await?;
    println!("Vault created at: {}", vault.path().display());
    Ok(())
}

pub async fn handle_open(args: OpenArgs, app: Trellis) -> Result<()> {
    app.open(&args.document, args.click).await
}

pub async fn handle_info(_args: InfoArgs, app: Trellis) -> Result<()> {
    app.info().await
}

pub async fn handle_relation(args: RelationArgs, app: Trellis) -> Result<()> {
    let vault = app
        .vault
        .as_ref()
        .map_err(|e| anyhow::anyhow!("No vault available: {}", e))?;

    match args.command {
        RelationCommands::List {} => {
            let settings = RelationsSettings::load(vault).await?;
            if settings.relations.is_empty() {
                println!("{}", style("No relations configured.").dim());
                return Ok(());
            }
            for (index, relation) in settings.relations.iter().enumerate() {
                println!(
                    "{:3}  {} = {}  ->  \"{}\"  ({})",
                    index,
                    relation.frontmatter_key,
                    relation.frontmatter_value,
                    relation.status_format,
                    behavior_label(relation.status_behavior),
                );
            }
        }
        RelationCommands::Add { key, value, format, icon, behavior } => {
            let mut settings = RelationsSettings::load(vault).await?;
            settings.add(RelationSettings {
                frontmatter_key: key,
                frontmatter_value: value,
                status_format: format,
                status_icon: icon,
                status_behavior: status_behavior_parse(&behavior),
            });
            settings.save(vault).await?;
            println!("Relation added ({} configured).", settings.relations.len());
        }
        RelationCommands::Remove { index, force } => {
            let mut settings = RelationsSettings::load(vault).await?;
            let Some(relation) = settings.relations.get(index) else {
                anyhow::bail!("No relation at position {}", index);
            };

            let prompt = format!(
                "Remove relation {} = {}?",
                relation.frontmatter_key, relation.frontmatter_value
            );
            if !force && !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Aborted.");
                return Ok(());
            }

            settings.remove(index);
            settings.save(vault).await?;
            println!("Relation removed ({} remaining).", settings.relations.len());
        }
        RelationCommands::Move { index, up, down } => {
            if up == down {
                anyhow::bail!("Specify exactly one of --up or --down");
            }
            let mut settings = RelationsSettings::load(vault).await?;
            let moved = if up {
                settings.move_up(index)
            } else {
                settings.move_down(index)
            };
            if !moved {
                anyhow::bail!("Cannot move relation at position {}", index);
            }
            settings.save(vault).await?;
            println!("Relation moved.");
        }
    }
    Ok(())
}

fn behavior_label(behavior: StatusBehavior) -> &'static str {
    match behavior {
        StatusBehavior::None => "none",
        StatusBehavior::OpenFile => "open file",
        StatusBehavior::HighlightFile => "highlight file",
    }
}
