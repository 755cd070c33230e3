//! Table formatting utilities using comfy-table.

use comfy_table::{Cell, Table};

/// Prints packages in publish order with their versions and internal
/// dependencies.
pub fn print_package_table(packages: &[(String, String, String)]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Package").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Version").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Depends on").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for (position, (name, version, deps)) in packages.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1).fg(comfy_table::Color::DarkGrey),
            Cell::new(name).fg(comfy_table::Color::White),
            Cell::new(version).fg(comfy_table::Color::Cyan),
            Cell::new(deps).fg(comfy_table::Color::DarkGrey),
        ]);
    }

    println!("{}", table);
}
