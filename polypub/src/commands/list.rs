//! `--list`: print the resolved publish order.

use anyhow::Result;
use polypub_core::PublishPlan;

use crate::formatting::{print_package_table, print_section_header, SectionStyle};

pub fn cmd_list(plan: &PublishPlan, json: bool) -> Result<()> {
    let packages = plan.target_packages();

    if json {
        let data = serde_json::json!({
            "degraded": plan.ordering.degraded,
            "packages": packages
                .iter()
                .map(|p| serde_json::json!({
                    "name": p.name,
                    "version": p.version,
                    "path": p.path,
                    "dependencies": p.deps,
                    "build": p.has_build(),
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    print_section_header("Publish Order", SectionStyle::Primary);
    let rows: Vec<(String, String, String)> = packages
        .iter()
        .map(|p| (p.name.clone(), p.version.clone(), p.deps.join(", ")))
        .collect();
    print_package_table(&rows);
    println!();

    Ok(())
}
