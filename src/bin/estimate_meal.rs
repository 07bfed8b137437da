//! Print the nutrition estimate for a meal description
//!
//! Usage: estimate_meal <description...>

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let description = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if description.trim().is_empty() {
        eprintln!("Usage: estimate_meal <description>");
        eprintln!("Example: estimate_meal 3 fried eggs with white toast");
        std::process::exit(2);
    }

    let estimate = nutrilog::estimate(&description);
    println!("{}", serde_json::to_string_pretty(&estimate)?);

    Ok(())
}
