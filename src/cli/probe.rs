use anyhow::Result;
use lunchline::config::Config;
use lunchline_menu::{MenuQuery, MenuSource, ServingDay, today_in};
use lunchline_schoolcafe::SchoolCafeClient;
use time::Date;

/// Fetches one menu and prints what came back. Sends nothing.
pub async fn probe(
    config: Config,
    date: Option<Date>,
    grade: Option<String>,
    line: Option<String>,
) -> Result<()> {
    let day = ServingDay::new(date.unwrap_or_else(|| today_in(&config.report.timezone)));
    let query = MenuQuery {
        school_id: config.school.id.clone(),
        serving_date: day.serving_date(),
        serving_line: line.unwrap_or(config.school.serving_line),
        meal_type: config.school.meal_type.clone(),
        grade: grade.unwrap_or(config.school.grade),
    };

    let client = SchoolCafeClient::new(&config.api)?;
    let menu = client.fetch(&query).await?;

    println!(
        "{} | grade {} | {} | {}",
        day, query.grade, query.serving_line, query.meal_type
    );

    if menu.is_empty() {
        println!("No menu items (weekend, holiday or not yet published)");
        return Ok(());
    }

    println!("{} categories", menu.category_count());
    for (name, items) in menu.categories() {
        println!("  {name}: {} items", items.len());
        let described = items.iter().filter_map(|item| item.description.as_deref());
        for description in described.take(3) {
            println!("    - {}", description.trim());
        }
        if items.len() > 3 {
            println!("    ... and {} more", items.len() - 3);
        }
    }

    Ok(())
}
