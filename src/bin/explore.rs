//! Utility to explore XML structure for development
use xml2table::parser::parse_str;
use xml2table::{source, FlattenConfig, Flattener, XmlNode};

fn main() {
    let path = std::env::args().nth(1).unwrap_or("test-files/catalog.xml".to_string());
    let config = FlattenConfig::default();
    let xml = source::read_file(&path).expect("Failed to read file");
    let root = parse_str(&xml, &config).expect("Failed to parse XML");

    println!("=== Summary ===");
    println!("  root: {}", root.name);
    println!("  elements: {}", root.element_count());
    println!("  depth: {}", root.depth());

    println!("\n=== Tree (repeating groups marked *) ===");
    print_tree(&root, 0);

    let rows = Flattener::new(config).flatten(&root);
    println!("\n=== Flattened ===");
    println!("  rows: {}", rows.len());
    if let Some(first) = rows.first() {
        for (key, value) in first.iter() {
            println!("  {} = {:?}", key, value);
        }
    }
}

fn print_tree(node: &XmlNode, indent: usize) {
    for group in node.child_groups() {
        let marker = if group.is_repeating() { "*" } else { " " };
        println!(
            "{}{} {} x{}",
            "  ".repeat(indent),
            marker,
            group.name,
            group.members.len()
        );
        if let Some(first) = group.members.first() {
            print_tree(first, indent + 1);
        }
    }
}
