use clap::Subcommand;
use rust_decimal::Decimal;

use super::{parse_decimal, print_json, Context};

#[derive(Subcommand)]
pub enum BaselineAction {
    /// Record cigarettes per day and price per pack
    Set {
        /// Cigarettes smoked per day
        #[arg(long, allow_negative_numbers = true)]
        cigarettes: i64,
        /// Price of one pack
        #[arg(long, value_parser = parse_decimal, allow_negative_numbers = true)]
        price: Decimal,
    },
    /// Show the current baseline
    Show,
}

pub fn run(user: &str, action: BaselineAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;
    let svc = ctx.service();
    match action {
        BaselineAction::Set { cigarettes, price } => {
            let baseline = svc.record_baseline(user, cigarettes, price)?;
            print_json(&baseline)?;
        }
        BaselineAction::Show => {
            print_json(&svc.current_baseline(user)?)?;
        }
    }
    Ok(())
}
