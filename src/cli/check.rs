use anyhow::Result;
use lunchline::config::Config;

fn mask(value: &str) -> &str {
    if value.trim().is_empty() { "NOT_SET" } else { "***" }
}

pub fn check_config(config: &Config) -> Result<()> {
    println!("School ID:          {}", config.school.id);
    println!("Grade:              {}", config.school.grade);
    println!("Serving line:       {}", config.school.serving_line);
    println!("Meal type:          {}", config.school.meal_type);
    println!("PreK serving line:  {}", config.school.prek_serving_line);
    println!("API:                {}", config.api.base_url);
    println!(
        "SMTP:               {}:{}",
        config.email.smtp_host, config.email.smtp_port
    );
    println!("Sender:             {}", mask(&config.email.smtp_username));
    println!("Password:           {}", mask(&config.email.smtp_password));
    println!("Recipients:         {}", config.recipients().len());
    println!("Category view:      {:?}", config.report.view);
    println!("Timezone:           {}", config.report.timezone);
    println!("Test run:           {}", config.test_run);

    match config.validate() {
        Ok(()) => {
            println!("Configuration is valid");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e)),
    }
}
