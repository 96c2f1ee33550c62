//! # Costeo CLI Application
//!
//! Terminal front end for the cost estimation engine. Prompts for the
//! numbers a product estimate needs, prints the derived costs and prices,
//! and can append the estimate to a `.cst` business file.
//!
//! A richer interactive shell may come later; this is a plain line-prompt
//! demo of the engine.

use std::io::{self, BufRead, Write};
use std::path::Path;

use costeo_core::breakdown::{material_slices, plant_expense_slices, slice_total};
use costeo_core::business::{Business, Currency, EstimateDefaults};
use costeo_core::errors::CostResult;
use costeo_core::estimation::estimate::{calculate, EstimateInput, TimeFrame};
use costeo_core::file_io::{load_business, save_business, FileLock};
use costeo_core::materials::MaterialRow;
use costeo_core::numeric::FieldValue;
use costeo_core::overhead::PlantExpense;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_line(prompt: &str, default: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn main() {
    println!("Costeo CLI - Cost & Price Estimator");
    println!("===================================");
    println!();

    let defaults = EstimateDefaults::default();
    let mut input = EstimateInput::default();

    input.product.product_name = prompt_line("Product name [Demo product]: ", "Demo product");

    println!();
    println!("Materials (leave the name blank to finish):");
    loop {
        let name = prompt_line(&format!("  Material #{} name: ", input.materials.len() + 1), "");
        if name.is_empty() {
            break;
        }
        let price = prompt_f64("    Lot price [0.00]: ", 0.0);
        let lot_size = prompt_f64("    Lot size [1.0]: ", 1.0);
        let quantity = prompt_f64("    Quantity used per run [0.0]: ", 0.0);
        input.materials.push(MaterialRow {
            name,
            unit_price: FieldValue::Number(price),
            lot_size: FieldValue::Number(lot_size),
            quantity_used: FieldValue::Number(quantity),
            ..Default::default()
        });
    }

    println!();
    println!("Monthly plant expenses (leave the name blank to finish):");
    loop {
        let name = prompt_line(
            &format!("  Expense #{} name: ", input.plant_expenses.len() + 1),
            "",
        );
        if name.is_empty() {
            break;
        }
        let monthly = prompt_f64("    Monthly cost [0.00]: ", 0.0);
        input.plant_expenses.push(PlantExpense::new(name, monthly));
    }

    println!();
    let work_days = prompt_f64("Work days per month (0 = no schedule) [25]: ", 25.0);
    let daily_output = prompt_f64("Average units per day (0 = skip) [0]: ", 0.0);
    let extra_cost = prompt_f64("Extra cost per unit [0.00]: ", 0.0);
    input.schedule.work_days = FieldValue::Number(work_days);
    input.schedule.daily_average_output = FieldValue::Number(daily_output);
    input.schedule.extra_unit_cost = FieldValue::Number(extra_cost);

    let produced = prompt_f64("Units produced in the period [1]: ", 1.0);
    let time_frame_raw = prompt_line("Time frame (week/twoWeeks/month) [week]: ", "week");
    let margin = prompt_f64(
        &format!("Margin percent [{}]: ", defaults.margin_percent),
        defaults.margin_percent,
    );
    input.product.produced_units = FieldValue::Number(produced);
    input.product.time_frame = TimeFrame::from_str_flexible(&time_frame_raw);
    input.product.margin_percent = FieldValue::Number(margin);

    if let Err(e) = input.validate() {
        eprintln!();
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }

    let result = calculate(&input);
    let currency = defaults.currency;

    println!();
    println!("═══════════════════════════════════════");
    println!("  COST ESTIMATE RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Product:    {}", input.product.product_name);
    println!("  Materials:  {} row(s)", input.materials.len());
    println!("  Expenses:   {} row(s)", input.plant_expenses.len());
    println!("  Time frame: {}", input.product.time_frame);
    println!("  All amounts in {}", currency.display_name());
    println!();
    println!("Costs:");
    println!("  Materials per run:  {} {:>10.2}", currency, result.materials_cost);
    println!("  Plant per month:    {} {:>10.2}", currency, result.plant_cost);
    println!("  Per work day:       {} {:>10.2}", currency, result.cost_per_work_day);
    println!("  Fixed for period:   {} {:>10.2}", currency, result.fixed_cost_for_period);
    println!("  Per day, per unit:  {} {:>10.2}", currency, result.daily_unit_cost);
    println!();
    println!("Pricing ({} unit(s)):", result.produced_units);
    println!("  Unit cost:          {} {:>10.2}", currency, result.unit_cost);
    println!(
        "  Sale price:         {} {:>10.2}  (margin {}%)",
        currency, result.sale_price, result.margin_percent
    );
    println!("  Profit per unit:    {} {:>10.2}", currency, result.profit_per_unit);
    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {}",
        if result.is_profitable() {
            "PROFITABLE"
        } else {
            "NOT PROFITABLE"
        }
    );
    println!("═══════════════════════════════════════");

    print_breakdowns(&input, currency);

    println!();
    println!("JSON Output (for LLM/API use):");
    if let Ok(json) = serde_json::to_string_pretty(&result) {
        println!("{}", json);
    }

    println!();
    let save = prompt_line("Save estimate to a business file? (y/N): ", "n");
    if save.eq_ignore_ascii_case("y") || save.eq_ignore_ascii_case("yes") {
        if let Err(e) = save_to_business_file(input) {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            std::process::exit(1);
        }
    }
}

fn print_breakdowns(input: &EstimateInput, currency: Currency) {
    let materials = material_slices(&input.materials);
    if !materials.is_empty() {
        let total = slice_total(&materials);
        println!();
        println!("Materials breakdown:");
        for slice in &materials {
            println!(
                "  {:<24} {} {:>10.2}  ({:.0}%)",
                slice.label,
                currency,
                slice.amount,
                slice.share_percent(total)
            );
        }
    }

    let expenses = plant_expense_slices(&input.plant_expenses);
    if !expenses.is_empty() {
        let total = slice_total(&expenses);
        println!();
        println!("Plant expenses breakdown:");
        for slice in &expenses {
            println!(
                "  {:<24} {} {:>10.2}  ({:.0}%)",
                slice.label,
                currency,
                slice.amount,
                slice.share_percent(total)
            );
        }
    }
}

/// Append the estimate to a `.cst` file, creating the business on first save.
fn save_to_business_file(input: EstimateInput) -> CostResult<()> {
    let path_raw = prompt_line("Business file [demo.cst]: ", "demo.cst");
    let path = Path::new(&path_raw);

    let lock = FileLock::acquire(path, whoami::username())?;

    let mut business = if path.exists() {
        load_business(path)?
    } else {
        let name = prompt_line("New business name [My business]: ", "My business");
        Business::new(name, whoami::username())
    };

    let id = business.add_estimate_from_input(input);
    save_business(&business, path)?;
    drop(lock);

    println!();
    println!(
        "Saved estimate {} to {} ({} estimate(s) on file)",
        id,
        path.display(),
        business.estimate_count()
    );

    Ok(())
}
