use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use cairn_crypto::IntegrityHasher;
use cairn_registry::{NewRecord, RegistryError};
use cairn_sdk::{Cairn, CairnConfig, InMemoryLedger, PublishRequest};
use cairn_store::InMemoryContentStore;
use cairn_types::{ContentId, IntegrityHash, Owner};
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CairnConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CairnConfig::default(),
    };
    debug!(source = ?cli.config, "configuration loaded");
    let format = cli.format;

    match cli.command {
        Command::Digest(args) => cmd_digest(args, format),
        Command::VerifyDigest(args) => cmd_verify_digest(args, format),
        Command::Publish(args) => cmd_publish(args, config, format).await,
        Command::Demo => cmd_demo(config, format).await,
        Command::Config => cmd_config(&config, format),
    }
}

fn cmd_digest(args: DigestArgs, format: OutputFormat) -> anyhow::Result<()> {
    let hash = IntegrityHasher::digest(&args.identifier);
    match format {
        OutputFormat::Text => println!("{hash}"),
        OutputFormat::Json => println!(
            "{}",
            json!({ "identifier": args.identifier, "integrityHash": hash })
        ),
    }
    Ok(())
}

fn cmd_verify_digest(args: VerifyDigestArgs, format: OutputFormat) -> anyhow::Result<()> {
    let claimed = IntegrityHash::from(args.hash.as_str());
    let matches = IntegrityHasher::verify(&args.identifier, &claimed);
    match format {
        OutputFormat::Text if matches => {
            println!("{} {} matches", "✓".green().bold(), args.identifier.bold())
        }
        OutputFormat::Text => println!(
            "{} {} does not match {}",
            "✗".red().bold(),
            args.identifier.bold(),
            claimed.short().yellow()
        ),
        OutputFormat::Json => println!(
            "{}",
            json!({ "identifier": args.identifier, "integrityHash": claimed, "matches": matches })
        ),
    }
    if !matches {
        anyhow::bail!("integrity hash mismatch");
    }
    Ok(())
}

async fn cmd_publish(
    args: PublishArgs,
    config: CairnConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut request = PublishRequest::new(name);
    if let Some(display_name) = args.display_name {
        request = request.with_display_name(display_name);
    }
    if let Some(media_ref) = args.media_ref {
        request = request.with_media_ref(media_ref);
    }

    let cairn = Cairn::initialize(config)?;
    let receipt = cairn
        .publish(&Owner::new(args.owner), Bytes::from(data), request)
        .await?;

    match format {
        OutputFormat::Text => {
            println!("{} Published {}", "✓".green().bold(), receipt.identifier.to_string().cyan());
            println!("  Integrity: {}", receipt.integrity_hash.short().yellow());
            println!("  Size: {} bytes", receipt.size);
            let pinned = if receipt.pinned { "yes".green() } else { "no".red() };
            println!("  Pinned: {pinned}");
            println!("  Ledger seq: {}", receipt.seq);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
    }
    cairn.dispose();
    Ok(())
}

struct Check {
    name: &'static str,
    passed: bool,
}

async fn cmd_demo(config: CairnConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = Arc::new(InMemoryContentStore::new());
    let ledger = Arc::new(InMemoryLedger::new(&config.ledger));
    let cairn = Cairn::with_backends(config, ledger, store.clone())?;
    let registry = cairn.registry();
    let alice = Owner::from("0xalice");
    let mut checks = Vec::new();

    let id = ContentId::from("bafyAAA");
    let hash = IntegrityHasher::digest_id(&id);
    registry.store(
        &alice,
        NewRecord::new(id.clone(), hash.clone())
            .with_display_name("demo")
            .with_media_ref("bafyIMG"),
    )?;
    checks.push(Check {
        name: "lookup by hash finds stored record",
        passed: registry.lookup_by_hash(&hash)? == Some(id.clone()),
    });
    checks.push(Check {
        name: "verify accepts the registered hash",
        passed: cairn.verify(&id, &hash),
    });

    registry.remove(&alice, &id)?;
    checks.push(Check {
        name: "remove clears the hash index",
        passed: registry.lookup_by_hash(&hash)?.is_none(),
    });
    checks.push(Check {
        name: "removed record is not found",
        passed: matches!(registry.get_record(&id), Err(RegistryError::NotFound(_))),
    });

    store.fail_pins(true);
    let receipt = cairn
        .publish(&alice, Bytes::from_static(b"{\"name\":\"demo\"}"), PublishRequest::new("demo.json"))
        .await?;
    store.fail_pins(false);
    checks.push(Check {
        name: "upload survives a failing pin service",
        passed: !receipt.pinned && receipt.size > 0,
    });

    let loose = store.insert_unpinned(&b"loose content"[..]);
    let transitions = store.pin_transitions();
    let first = cairn.pin(&loose).await;
    let second = cairn.pin(&loose).await;
    checks.push(Check {
        name: "ensure pinned is idempotent",
        passed: first && second && store.pin_transitions() == transitions + 1,
    });

    let healed = store.insert_unpinned(&b"unpinned metadata"[..]);
    registry.store(&alice, NewRecord::new(healed.clone(), IntegrityHasher::digest_id(&healed)))?;
    cairn.view(&healed).await?;
    checks.push(Check {
        name: "reading a record pins its content",
        passed: store.contains_pin(&healed),
    });

    checks.push(Check {
        name: "registry indices agree",
        passed: registry.audit()?.is_clean(),
    });

    let stats = cairn.dispose();
    let failed = checks.iter().filter(|c| !c.passed).count();
    match format {
        OutputFormat::Text => {
            for check in &checks {
                let mark = if check.passed { "✓".green().bold() } else { "✗".red().bold() };
                println!("{mark} {}", check.name);
            }
            println!(
                "\n{} uploads, {} pin requests, {} pin failures",
                stats.uploads, stats.pin_requests, stats.pin_failures
            );
        }
        OutputFormat::Json => {
            let results: Vec<_> = checks
                .iter()
                .map(|c| json!({ "name": c.name, "passed": c.passed }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "checks": results, "pinStats": stats }))?
            );
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} demo checks failed");
    }
    Ok(())
}

fn cmd_config(config: &CairnConfig, format: OutputFormat) -> anyhow::Result<()> {
    config.validate()?;
    match format {
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}
