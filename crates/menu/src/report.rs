//! Turns reconciled menus into a report ready to be mailed.
//!
//! Rendering never fails: missing or empty menus degrade to placeholders, and
//! a report with nothing to show becomes the "no menu available" notice.

use std::fmt;

use crate::{
    CategoryView, Menu, MenuItem, PREFERRED_CATEGORIES, PrekMatches, ReportMode, ServingDay,
};

pub const PREK_MARKER: &str = "[Pre-K]";

pub const NO_MENU_REASONS: [&str; 4] = [
    "It's a weekend (no school)",
    "It's a holiday",
    "The menu hasn't been published yet",
    "There was an issue fetching the menu data",
];

/// A target date with its main line menu, `None` when the fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMenu {
    pub day: ServingDay,
    pub menu: Option<Menu>,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub mode: ReportMode,
    pub test_run: bool,
    pub meal_type: String,
    pub view: CategoryView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub mode: ReportMode,
    pub test_run: bool,
    pub subject: String,
    pub heading: String,
    pub subtitle: String,
    pub banner: Option<String>,
    pub body: ReportBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBody {
    Days(Vec<DaySection>),
    NoMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySection {
    pub day: ServingDay,
    pub title: String,
    pub content: DayContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayContent {
    Categories(Vec<CategorySection>),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySection {
    pub name: String,
    pub title: String,
    pub items: Vec<RenderedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub name: String,
    pub prek: bool,
    pub serving_size: Option<String>,
    pub calories: Option<String>,
    pub allergens: Option<String>,
}

impl RenderedItem {
    fn from_item(item: &MenuItem, prek_entree: Option<&str>) -> Option<Self> {
        let description = item.description.as_deref()?;
        let prek = prek_entree == Some(description);
        let name = description.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            prek,
            serving_size: item.serving_size.clone(),
            calories: item.calories.clone(),
            allergens: item
                .allergens
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
            name: name.to_owned(),
        })
    }

    /// Description with the PreK marker when it applies.
    pub fn display_name(&self) -> String {
        if self.prek {
            format!("{} {PREK_MARKER}", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl DaySection {
    pub fn is_available(&self) -> bool {
        matches!(self.content, DayContent::Categories(_))
    }

    pub fn categories(&self) -> &[CategorySection] {
        match &self.content {
            DayContent::Categories(categories) => categories,
            DayContent::Unavailable => &[],
        }
    }

    pub fn item_count(&self) -> usize {
        self.categories().iter().map(|c| c.items.len()).sum()
    }
}

impl Report {
    pub fn days(&self) -> &[DaySection] {
        match &self.body {
            ReportBody::Days(days) => days,
            ReportBody::NoMenu => &[],
        }
    }

    pub fn has_menu(&self) -> bool {
        matches!(self.body, ReportBody::Days(_))
    }

    pub fn item_count(&self) -> usize {
        self.days().iter().map(DaySection::item_count).sum()
    }

    pub fn no_menu_reasons(&self) -> &'static [&'static str] {
        &NO_MENU_REASONS
    }

    /// Every rendered item carrying the PreK marker.
    pub fn prek_items(&self) -> impl Iterator<Item = &RenderedItem> {
        self.days()
            .iter()
            .flat_map(DaySection::categories)
            .flat_map(|category| category.items.iter())
            .filter(|item| item.prek)
    }
}

pub fn render(days: &[DayMenu], prek: &PrekMatches, options: &RenderOptions) -> Report {
    let sections = days
        .iter()
        .map(|day_menu| {
            let prek_entree = prek.get(&day_menu.day.date).map(String::as_str);
            render_day(day_menu, prek_entree, options.view)
        })
        .collect::<Vec<_>>();

    let item_count: usize = sections.iter().map(DaySection::item_count).sum();
    let body = if item_count == 0 {
        ReportBody::NoMenu
    } else {
        ReportBody::Days(sections)
    };

    tracing::info!(
        days = days.len(),
        items = item_count,
        "formatted menu report"
    );

    let first = days.first().map(|d| d.day);
    let meal = options.meal_type.as_str();

    let (subject, heading, subtitle, banner) = match (options.mode, options.test_run) {
        (ReportMode::Daily, true) => (
            format!(
                "TEST: Today's School {meal} Menu{}",
                date_suffix(first)
            ),
            format!("Today's School {meal} Menu"),
            first.map(|d| d.long_date()).unwrap_or_default(),
            Some("This is a test email - Menu shown is for today, not tomorrow".to_owned()),
        ),
        (ReportMode::Daily, false) => (
            format!("Tomorrow's School {meal} Menu{}", date_suffix(first)),
            format!("Tomorrow's School {meal} Menu"),
            first.map(|d| d.long_date()).unwrap_or_default(),
            None,
        ),
        (ReportMode::Weekly, true) => (
            format!("TEST: Weekly School {meal} Menu - Rest of Current Week"),
            format!("This Week's School {meal} Menu"),
            "Rest of Current Week".to_owned(),
            Some(
                "TEST RUN - This is a test email showing the rest of the current week".to_owned(),
            ),
        ),
        (ReportMode::Weekly, false) => (
            format!("Weekly School {meal} Menu - Next Week"),
            format!("Next Week's School {meal} Menu"),
            "Upcoming Week".to_owned(),
            None,
        ),
    };

    Report {
        mode: options.mode,
        test_run: options.test_run,
        subject,
        heading,
        subtitle,
        banner,
        body,
    }
}

fn date_suffix(day: Option<ServingDay>) -> String {
    day.map(|d| format!(" - {}", d.long_date()))
        .unwrap_or_default()
}

fn render_day(day_menu: &DayMenu, prek_entree: Option<&str>, view: CategoryView) -> DaySection {
    let day = day_menu.day;
    let title = format!("{} - {}", day.weekday, day.month_day_year());

    let categories = match &day_menu.menu {
        Some(menu) if !menu.is_empty() => render_categories(menu, prek_entree, view),
        Some(_) => {
            tracing::debug!(date = %day, "confirmed no menu");
            Vec::new()
        }
        None => {
            tracing::debug!(date = %day, "menu unknown, rendering placeholder");
            Vec::new()
        }
    };

    let content = if categories.is_empty() {
        DayContent::Unavailable
    } else {
        DayContent::Categories(categories)
    };

    DaySection { day, title, content }
}

fn render_categories(
    menu: &Menu,
    prek_entree: Option<&str>,
    view: CategoryView,
) -> Vec<CategorySection> {
    let mut names: Vec<&str> = PREFERRED_CATEGORIES.to_vec();

    if view == CategoryView::Full {
        names.extend(
            menu.categories()
                .map(|(name, _)| name)
                .filter(|name| !PREFERRED_CATEGORIES.iter().any(|preferred| preferred == name)),
        );
    }

    names
        .into_iter()
        .filter_map(|name| {
            let items = menu
                .category(name)
                .iter()
                .filter_map(|item| RenderedItem::from_item(item, prek_entree))
                .collect::<Vec<_>>();

            (!items.is_empty()).then(|| CategorySection {
                name: name.to_owned(),
                title: title_case(name),
                items,
            })
        })
        .collect()
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn title_case(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut previous_is_letter = false;

    for ch in name.chars() {
        if previous_is_letter {
            title.extend(ch.to_lowercase());
        } else {
            title.extend(ch.to_uppercase());
        }
        previous_is_letter = ch.is_alphabetic();
    }

    title
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(banner) = &self.banner {
            writeln!(f, "*** {banner} ***")?;
            writeln!(f)?;
        }

        writeln!(f, "{}", self.heading)?;
        writeln!(f, "{}", self.subtitle)?;

        match &self.body {
            ReportBody::NoMenu => {
                writeln!(f)?;
                writeln!(f, "No Menu Available")?;
                let period = match self.mode {
                    ReportMode::Daily => "this date",
                    ReportMode::Weekly => "these dates",
                };
                writeln!(
                    f,
                    "There's no menu available for {period}. This could be because:"
                )?;
                for reason in NO_MENU_REASONS {
                    writeln!(f, "  - {reason}")?;
                }
            }
            ReportBody::Days(days) => {
                for day in days {
                    writeln!(f)?;
                    writeln!(f, "== {} ==", day.title)?;

                    if !day.is_available() {
                        writeln!(f, "No menu available for this day")?;
                        continue;
                    }

                    for category in day.categories() {
                        writeln!(f, "{}", category.title)?;
                        for item in &category.items {
                            writeln!(f, "  - {}", item.display_name())?;
                            if let Some(size) = &item.serving_size {
                                writeln!(f, "    Serving Size: {size}")?;
                            }
                            if let Some(calories) = &item.calories {
                                writeln!(f, "    Calories: {calories}")?;
                            }
                            if let Some(allergens) = &item.allergens {
                                writeln!(f, "    Allergens: {allergens}")?;
                            }
                        }
                    }
                }
            }
        }

        writeln!(f)?;
        write!(f, "Data provided by SchoolCafe")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENTREES;
    use time::macros::date;

    fn options(mode: ReportMode, test_run: bool) -> RenderOptions {
        RenderOptions {
            mode,
            test_run,
            meal_type: "Lunch".to_owned(),
            view: CategoryView::Curated,
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ENTREES"), "Entrees");
        assert_eq!(title_case("GRAB N GO"), "Grab N Go");
        assert_eq!(title_case("MILK/DAIRY"), "Milk/Dairy");
    }

    #[test]
    fn test_prek_marker_needs_exact_description() {
        let item = MenuItem::new("Tacos ");

        let rendered = RenderedItem::from_item(&item, Some("Tacos ")).unwrap();
        assert!(rendered.prek);
        assert_eq!(rendered.display_name(), "Tacos [Pre-K]");

        let rendered = RenderedItem::from_item(&item, Some("Tacos")).unwrap();
        assert!(!rendered.prek);
    }

    #[test]
    fn test_allergens_are_trimmed_and_blank_dropped() {
        let item = MenuItem {
            description: Some("Tacos".to_owned()),
            allergens: Some("   ".to_owned()),
            ..Default::default()
        };
        let rendered = RenderedItem::from_item(&item, None).unwrap();
        assert_eq!(rendered.allergens, None);

        let item = item.allergens(" Milk, Wheat ");
        let rendered = RenderedItem::from_item(&item, None).unwrap();
        assert_eq!(rendered.allergens.as_deref(), Some("Milk, Wheat"));
    }

    #[test]
    fn test_full_view_appends_other_categories_by_name() {
        let menu = Menu::new()
            .with_category("SAUCES", [MenuItem::new("Ranch")])
            .with_category("BREADS", [MenuItem::new("Roll")])
            .with_category("MILK", [MenuItem::new("1% Milk")])
            .with_category(ENTREES, [MenuItem::new("Tacos")]);

        let names = |view| {
            render_categories(&menu, None, view)
                .into_iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
        };

        assert_eq!(names(CategoryView::Curated), vec!["ENTREES", "MILK"]);
        assert_eq!(
            names(CategoryView::Full),
            vec!["ENTREES", "MILK", "BREADS", "SAUCES"]
        );
    }

    #[test]
    fn test_daily_subject_mentions_date() {
        let day = ServingDay::new(date!(2025 - 08 - 19));
        let menu = Menu::new().with_category(ENTREES, [MenuItem::new("Tacos")]);
        let report = render(
            &[DayMenu {
                day,
                menu: Some(menu),
            }],
            &PrekMatches::new(),
            &options(ReportMode::Daily, false),
        );

        assert_eq!(
            report.subject,
            "Tomorrow's School Lunch Menu - Tuesday, August 19, 2025"
        );
        assert_eq!(report.banner, None);
    }

    #[test]
    fn test_plain_text_lists_details() {
        let day = ServingDay::new(date!(2025 - 08 - 19));
        let menu = Menu::new().with_category(
            ENTREES,
            [MenuItem::new("Cheese Pizza")
                .serving_size("1 slice")
                .calories("300")
                .allergens("Milk, Wheat")],
        );
        let prek = PrekMatches::from([(day.date, "Cheese Pizza".to_owned())]);
        let report = render(
            &[DayMenu {
                day,
                menu: Some(menu),
            }],
            &prek,
            &options(ReportMode::Daily, true),
        );

        let text = report.to_string();
        assert!(text.starts_with("*** This is a test email"));
        assert!(text.contains("== Tuesday - August 19, 2025 =="));
        assert!(text.contains("  - Cheese Pizza [Pre-K]"));
        assert!(text.contains("    Serving Size: 1 slice"));
        assert!(text.contains("    Calories: 300"));
        assert!(text.contains("    Allergens: Milk, Wheat"));
    }
}
