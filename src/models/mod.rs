mod forecast;
mod month;
mod sale;

pub use forecast::{ForecastMethod, ForecastPoint};
pub use month::MonthKey;
pub use sale::Sale;
