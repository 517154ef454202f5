mod properties;
mod results;
mod scenarios;
