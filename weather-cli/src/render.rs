use weather_lookup_core::{View, WeatherRecord};

pub const SETUP_NOTICE: &str = "API is not fully configured. \
     Running in demo mode with mocked data.\n\
     To enable live data, run `weather-lookup configure` \
     or set WEATHER_API_BASE and WEATHER_API_KEY.";

const MISSING: &str = "—";

pub fn render_view(view: &View) -> String {
    match view {
        View::Empty { city_requested: true } => {
            "No results yet. Try searching a different city.".to_string()
        }
        View::Empty { city_requested: false } => {
            "Start by searching for a city to see the current weather.".to_string()
        }
        View::Loading => "Loading...".to_string(),
        View::Error(message) => format!("Unable to load weather.\n{message}"),
        View::Weather(record) => render_record(record),
    }
}

pub fn render_record(record: &WeatherRecord) -> String {
    let badge = if record.is_demo { "DEMO" } else { "Live" };
    let temperature = record
        .temperature_c
        .map_or_else(|| MISSING.to_string(), |t| format!("{t}°"));
    let humidity = record
        .humidity
        .map_or_else(|| MISSING.to_string(), |h| format!("{h}%"));

    let mut out = format!(
        "{icon}  Current weather in {city}  [{badge}]\n\
         \x20  {temperature}  {condition}\n\
         \x20  Humidity    {humidity}\n\
         \x20  Feels like  {temperature}",
        icon = record.icon,
        city = record.city,
        condition = record.condition,
    );

    if let Some(message) = &record.message {
        out.push_str("\n   ");
        out.push_str(message);
    }

    out
}
