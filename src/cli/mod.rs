#![allow(clippy::module_inception)]
pub mod cli;
pub mod handlers;

use crate::api::{ApiClient, ReqwestTransport};
use crate::cli::cli::{Cli, Commands, CopyFieldArg, ProfileCommand};
use crate::cli::handlers::{AddOptions, CardCommands, CopyOptions, EditOptions};
use crate::clipboard::ClipField;
use crate::config::app_config::{
    load_file_config_with_path, save_file_config, validate_base_url, Config, FileProfileConfig,
};
use crate::logging;
use crate::records::RecordService;
use crate::tui;
use clap::Parser;
use std::sync::Arc;

pub fn build_service(config: &Config) -> anyhow::Result<Arc<RecordService>> {
    let transport = ReqwestTransport::new(&config.base_url, config.request_timeout)?;
    let api = ApiClient::new(Arc::new(transport));
    Ok(Arc::new(RecordService::new(api)))
}

/// Backend selection from the global flags, resolved only by commands that
/// talk to the backend.
struct Target {
    base_url: Option<String>,
    profile: Option<String>,
}

impl Target {
    fn config(self) -> anyhow::Result<Config> {
        let config = Config::create(self.base_url, self.profile)?;
        tracing::debug!(base_url = %config.base_url, "resolved configuration");
        Ok(config)
    }

    /// Config plus service for the one-shot commands, logging to stderr.
    fn connect(self) -> anyhow::Result<(Config, Arc<RecordService>)> {
        logging::init_cli();
        let config = self.config()?;
        let service = build_service(&config)?;
        Ok((config, service))
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let target = Target {
        base_url: cli.base_url,
        profile: cli.profile,
    };

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Profile(cmd) => {
            logging::init_cli();
            handle_profile_commands(cmd)
        }
        Commands::Tui => {
            let config = target.config()?;
            logging::init_tui(config.log_file.as_deref())?;
            let service = build_service(&config)?;
            tui::launch(&config, service).await
        }
        Commands::List {
            query,
            show_users,
            json,
        } => {
            let (config, service) = target.connect()?;
            CardCommands::new(&config, service)
                .handle_list(query, show_users, json)
                .await
        }
        Commands::Show {
            id,
            reveal_password,
        } => {
            let (config, service) = target.connect()?;
            CardCommands::new(&config, service)
                .handle_show(&id, reveal_password)
                .await
        }
        Commands::Add {
            name,
            url,
            username,
        } => {
            let (config, service) = target.connect()?;
            CardCommands::new(&config, service)
                .handle_add(AddOptions {
                    name,
                    url,
                    username,
                })
                .await
        }
        Commands::Edit {
            id,
            name,
            url,
            username,
            password_prompt,
        } => {
            let (config, service) = target.connect()?;
            CardCommands::new(&config, service)
                .handle_edit(
                    &id,
                    EditOptions {
                        name,
                        url,
                        username,
                        password_prompt,
                    },
                )
                .await
        }
        Commands::Rm { id } => {
            let (config, service) = target.connect()?;
            CardCommands::new(&config, service).handle_rm(&id).await
        }
        Commands::Copy {
            id,
            field,
            no_copy,
            echo,
            ttl,
        } => {
            let field = match field {
                CopyFieldArg::Password => ClipField::Password,
                CopyFieldArg::Username => ClipField::Username,
            };
            let (config, service) = target.connect()?;
            CardCommands::new(&config, service)
                .handle_copy(
                    &id,
                    CopyOptions {
                        field,
                        no_copy,
                        echo,
                        ttl,
                    },
                )
                .await
        }
    }
}

fn handle_profile_commands(cmd: ProfileCommand) -> anyhow::Result<()> {
    let (path, mut cfg) = load_file_config_with_path();
    let profiles = cfg.profiles.get_or_insert_with(Default::default);

    match cmd {
        ProfileCommand::List => {
            let default = cfg.default_profile.as_deref();
            if profiles.is_empty() {
                println!("No profiles defined.");
            } else {
                println!("Profiles:");
                for (name, p) in profiles.iter() {
                    if Some(name.as_str()) == default {
                        println!("  {name} -> {} (default)", p.base_url);
                    } else {
                        println!("  {name} -> {}", p.base_url);
                    }
                }
            }
            // Listing never rewrites the file.
            return Ok(());
        }
        ProfileCommand::Show { name } => {
            match profiles.get(&name) {
                Some(p) => println!("profile: {name}\n  base_url: {}", p.base_url),
                None => anyhow::bail!(
                    "profile \"{name}\" is not defined; run `passcard profile list` to see available profiles"
                ),
            }
            return Ok(());
        }
        ProfileCommand::Add {
            name,
            url,
            on_duplicate_override,
        } => {
            if profiles.contains_key(&name) && !on_duplicate_override {
                anyhow::bail!(
                    "profile \"{name}\" already exists; use --on-duplicate-override to update it"
                );
            }
            validate_base_url(&url)?;
            profiles.insert(name.clone(), FileProfileConfig { base_url: url.clone() });
            println!("Profile \"{name}\" set to base_url: {url}");
        }
        ProfileCommand::Rm { name } => {
            if cfg.default_profile.as_deref() == Some(name.as_str()) {
                anyhow::bail!(
                    "cannot remove default profile \"{name}\"; run `passcard profile default --clear` or change default first"
                );
            }
            if profiles.remove(&name).is_some() {
                println!("Removed profile \"{name}\".");
            } else {
                anyhow::bail!("profile \"{name}\" is not defined; run `passcard profile list`.");
            }
        }
        ProfileCommand::Default { name, clear } => {
            if clear {
                cfg.default_profile = None;
                println!("Default profile cleared.");
            } else if let Some(name) = name {
                if profiles.contains_key(&name) {
                    cfg.default_profile = Some(name.clone());
                    println!("Default profile set to \"{name}\".");
                } else {
                    anyhow::bail!("profile \"{name}\" is not defined; run `passcard profile list`.");
                }
            } else {
                match cfg.default_profile.as_deref() {
                    Some(name) => println!("Default profile: {name}"),
                    None => println!("No default profile set."),
                }
                return Ok(());
            }
        }
    }

    save_file_config(&path, &cfg)?;
    Ok(())
}
