use lunchline_menu::{
    CategoryView, DayContent, DayMenu, ENTREES, Menu, MenuItem, PrekMatches, RenderOptions,
    ReportBody, ReportMode, ServingDay, prek_entree, render,
};
use time::macros::date;

fn options(mode: ReportMode, test_run: bool) -> RenderOptions {
    RenderOptions {
        mode,
        test_run,
        meal_type: "Lunch".to_owned(),
        view: CategoryView::Curated,
    }
}

fn school_day() -> Menu {
    Menu::new()
        .with_category(
            ENTREES,
            [
                MenuItem::new("Cheese Pizza")
                    .serving_size("1 slice")
                    .calories("290")
                    .allergens("Milk, Wheat"),
                MenuItem::new("Pepperoni Pizza").calories("320"),
                MenuItem::new("Chicken Nuggets"),
            ],
        )
        .with_category("VEGETABLES", [MenuItem::new("Green Beans")])
        .with_category("FRUITS", Vec::new())
        .with_category("MILK", [MenuItem::new("1% Milk"), MenuItem::default()])
}

fn prek_day() -> Menu {
    Menu::new().with_category(
        ENTREES,
        [MenuItem::new("Cheese Pizza"), MenuItem::new("Fish Sticks")],
    )
}

#[test]
fn test_reconcile_example() {
    assert_eq!(
        prek_entree(Some(&school_day()), Some(&prek_day())).as_deref(),
        Some("Cheese Pizza")
    );
    assert_eq!(prek_entree(None, Some(&Menu::new())), None);
}

#[test]
fn test_daily_report_marks_only_reconciled_entree() {
    let day = ServingDay::new(date!(2025 - 08 - 19));
    let mut prek = PrekMatches::new();
    if let Some(entree) = prek_entree(Some(&school_day()), Some(&prek_day())) {
        prek.insert(day.date, entree);
    }

    let report = render(
        &[DayMenu {
            day,
            menu: Some(school_day()),
        }],
        &prek,
        &options(ReportMode::Daily, false),
    );

    let marked = report.prek_items().map(|i| i.name.as_str()).collect::<Vec<_>>();
    assert_eq!(marked, vec!["Cheese Pizza"]);
    assert_eq!(report.item_count(), 5);

    let day = &report.days()[0];
    let titles = day
        .categories()
        .iter()
        .map(|c| c.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Entrees", "Vegetables", "Milk"]);

    let entrees = &day.categories()[0].items;
    assert_eq!(
        entrees.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        vec!["Cheese Pizza", "Pepperoni Pizza", "Chicken Nuggets"]
    );
    assert_eq!(entrees[0].display_name(), "Cheese Pizza [Pre-K]");
    assert_eq!(entrees[1].display_name(), "Pepperoni Pizza");
}

#[test]
fn test_prek_match_only_applies_to_its_date() {
    let monday = ServingDay::new(date!(2025 - 08 - 18));
    let tuesday = ServingDay::new(date!(2025 - 08 - 19));
    let prek = PrekMatches::from([(monday.date, "Cheese Pizza".to_owned())]);

    let report = render(
        &[
            DayMenu {
                day: monday,
                menu: Some(school_day()),
            },
            DayMenu {
                day: tuesday,
                menu: Some(school_day()),
            },
        ],
        &prek,
        &options(ReportMode::Weekly, false),
    );

    assert_eq!(report.prek_items().count(), 1);
    assert!(report.days()[0].categories()[0].items[0].prek);
    assert!(!report.days()[1].categories()[0].items[0].prek);
}

#[test]
fn test_zero_items_yields_no_menu_variant() {
    let days = [
        DayMenu {
            day: ServingDay::new(date!(2025 - 08 - 18)),
            menu: None,
        },
        DayMenu {
            day: ServingDay::new(date!(2025 - 08 - 19)),
            menu: Some(Menu::new()),
        },
        DayMenu {
            day: ServingDay::new(date!(2025 - 08 - 20)),
            menu: Some(Menu::new().with_category("SNACKS", [MenuItem::new("Pretzels")])),
        },
    ];

    for mode in [ReportMode::Daily, ReportMode::Weekly] {
        let report = render(&days, &PrekMatches::new(), &options(mode, false));

        assert_eq!(report.body, ReportBody::NoMenu);
        assert!(!report.has_menu());
        assert_eq!(report.item_count(), 0);

        let text = report.to_string();
        assert!(text.contains("No Menu Available"));
        assert!(text.contains("It's a holiday"));
    }
}

#[test]
fn test_failed_and_empty_days_render_same_placeholder() {
    let days = [
        DayMenu {
            day: ServingDay::new(date!(2025 - 08 - 18)),
            menu: None,
        },
        DayMenu {
            day: ServingDay::new(date!(2025 - 08 - 19)),
            menu: Some(Menu::new()),
        },
        DayMenu {
            day: ServingDay::new(date!(2025 - 08 - 20)),
            menu: Some(school_day()),
        },
    ];

    let report = render(&days, &PrekMatches::new(), &options(ReportMode::Weekly, false));

    let contents = report
        .days()
        .iter()
        .map(|d| &d.content)
        .collect::<Vec<_>>();
    assert_eq!(contents[0], &DayContent::Unavailable);
    assert_eq!(contents[1], &DayContent::Unavailable);
    assert!(report.days()[2].is_available());

    let text = report.to_string();
    assert_eq!(text.matches("No menu available for this day").count(), 2);
    assert!(text.contains("== Monday - August 18, 2025 =="));
}

#[test]
fn test_presentation_strings_follow_mode_and_flag() {
    let days = [DayMenu {
        day: ServingDay::new(date!(2025 - 08 - 19)),
        menu: Some(school_day()),
    }];
    let prek = PrekMatches::new();

    let today = render(&days, &prek, &options(ReportMode::Daily, true));
    assert!(today.subject.starts_with("TEST: Today's School Lunch Menu"));
    assert_eq!(today.heading, "Today's School Lunch Menu");
    assert!(today.banner.is_some());

    let tomorrow = render(&days, &prek, &options(ReportMode::Daily, false));
    assert!(tomorrow.subject.starts_with("Tomorrow's School Lunch Menu"));
    assert_eq!(tomorrow.subtitle, "Tuesday, August 19, 2025");
    assert!(tomorrow.banner.is_none());

    let this_week = render(&days, &prek, &options(ReportMode::Weekly, true));
    assert_eq!(this_week.heading, "This Week's School Lunch Menu");
    assert!(this_week.subject.contains("Rest of Current Week"));

    let next_week = render(&days, &prek, &options(ReportMode::Weekly, false));
    assert_eq!(next_week.heading, "Next Week's School Lunch Menu");
    assert_eq!(next_week.subject, "Weekly School Lunch Menu - Next Week");
}

#[test]
fn test_full_view_includes_every_category() {
    let menu = school_day().with_category("CONDIMENTS", [MenuItem::new("Ketchup")]);
    let days = [DayMenu {
        day: ServingDay::new(date!(2025 - 08 - 19)),
        menu: Some(menu),
    }];
    let mut full = options(ReportMode::Daily, false);
    full.view = CategoryView::Full;

    let report = render(&days, &PrekMatches::new(), &full);
    let titles = report.days()[0]
        .categories()
        .iter()
        .map(|c| c.title.clone())
        .collect::<Vec<_>>();

    assert_eq!(titles, vec!["Entrees", "Vegetables", "Milk", "Condiments"]);
}
