use eframe::egui::{CollapsingHeader, Ui};
use enviro_insights::data::stats::DescriptiveStats;

use crate::state::{DatasetFacts, InfoTab};
use crate::ui::table::fmt_opt;

const GLOSSARY: [(&str, &str); 4] = [
    (
        "What is PM2.5?",
        "Particulate matter with a diameter below 2.5 micrometres, about 3% of the width of \
         a human hair. Found in smoke and haze, it reaches deep into the lungs.",
    ),
    (
        "What is PM10?",
        "Particulate matter with a diameter below 10 micrometres, about a seventh of the width \
         of a human hair. Typical sources are dust, pollen and mould.",
    ),
    (
        "What is AQI?",
        "The Air Quality Index reports how polluted the air is, on a scale from 0 to 500. \
         Higher values mean greater health concern.",
    ),
    (
        "What is an AQI category?",
        "A qualitative band of the index. PM2.5 readings here are grouped into Good, Moderate, \
         Unhealthy for Sensitive Groups, Unhealthy and Very Unhealthy.",
    ),
];

pub fn info_tab(ui: &mut Ui, tab: InfoTab, facts: Option<&DatasetFacts>) {
    match tab {
        InfoTab::About => {
            for (title, body) in GLOSSARY {
                CollapsingHeader::new(title).show(ui, |ui: &mut Ui| {
                    ui.label(body);
                });
            }
        }
        InfoTab::DatasetFacts => {
            let Some(facts) = facts else { return };
            extremes(ui, "PM2.5 Levels", "PM2.5", &facts.pm25);
            extremes(ui, "PM10 Levels", "PM10", &facts.pm10);
        }
        InfoTab::StatisticalInsights => {
            let Some(facts) = facts else { return };
            central(ui, "PM2.5 Levels", "PM2.5", &facts.pm25);
            central(ui, "PM10 Levels", "PM10", &facts.pm10);
        }
    }
}

fn extremes(ui: &mut Ui, title: &str, name: &str, stats: &DescriptiveStats) {
    CollapsingHeader::new(title).show(ui, |ui: &mut Ui| {
        ui.label(format!(
            "The highest {name} level recorded is {} µg/m³.",
            fmt_opt(stats.max)
        ));
        ui.label(format!(
            "The lowest {name} level recorded is {} µg/m³.",
            fmt_opt(stats.min)
        ));
    });
}

fn central(ui: &mut Ui, title: &str, name: &str, stats: &DescriptiveStats) {
    CollapsingHeader::new(title).show(ui, |ui: &mut Ui| {
        ui.label(format!("The average {name} level is {} µg/m³.", fmt_opt(stats.mean)));
        ui.label(format!("The median {name} level is {} µg/m³.", fmt_opt(stats.median)));
        ui.label(format!(
            "The standard deviation of {name} levels is {} µg/m³.",
            fmt_opt(stats.std_dev)
        ));
    });
}
