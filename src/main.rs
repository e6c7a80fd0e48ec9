use anyhow::Result;
use chrono::{Local, Utc};
use skytodo_todo::dates::{format_clock, format_due_short};

#[tokio::main]
async fn main() -> Result<()> {
    skytodo_core::init()?;

    let (config, _warnings) = skytodo_core::Config::load_validated()?;
    let mut app = skytodo_core::App::new(config)?;

    tracing::info!("SkyTodo started");

    let now = Utc::now();
    let weather = app.load_weather().await.clone();
    let info = &weather.info;

    println!("SkyTodo - {}", format_clock(now, &Local));
    println!();
    println!(
        "{}  {}°C  {}  ({})",
        info.city,
        info.temperature,
        info.display_condition(),
        info.icon().name()
    );
    println!(
        "  体感: {}°C  湿度: {}%  风速: {} km/h",
        info.feels_like, info.humidity, info.wind_speed
    );
    if let Some(error) = &weather.error {
        println!("  {}", error);
    }

    println!();
    println!("待办事项");
    let todos = app.todos().ordered_view();
    if todos.is_empty() {
        println!("  暂无待办事项");
    }
    for item in todos {
        let mark = if item.is_completed { "x" } else { " " };
        let due = match item.due_date {
            Some(due) if item.is_overdue(now) => format!("  截止: {} (已过期)", format_due_short(due, &Local)),
            Some(due) => format!("  截止: {}", format_due_short(due, &Local)),
            None => String::new(),
        };
        println!("  [{}] {}{}", mark, item.text, due);
    }

    Ok(())
}
