use clap::{Args, Subcommand};
use spruce::{
    checkout::{ApplyCouponError, apply_coupon_code},
    context::Storefront,
    money::format_amount,
};

use super::write_line;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Validate a code and apply it to the cart
    Apply(ApplyArgs),

    /// Remove the applied coupon
    Remove,
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Coupon code (case-insensitive)
    code: String,
}

pub(crate) async fn run(storefront: &Storefront, command: CouponCommand) -> Result<(), String> {
    let mut ledger = storefront.ledger().map_err(|error| error.to_string())?;

    match command.command {
        CouponSubcommand::Apply(args) => {
            let coupon = match apply_coupon_code(&mut ledger, &storefront.coupons, &args.code).await {
                Ok(coupon) => coupon,
                Err(ApplyCouponError::Rejected(rejection)) => return Err(rejection.to_string()),
                Err(ApplyCouponError::Ledger(error)) => {
                    return Err(format!("coupon applied but not saved: {error}"));
                }
            };

            write_line(format_args!("Applied {} ({})", coupon.code, coupon.discount))?;
        }
        CouponSubcommand::Remove => match ledger.remove_coupon().map_err(|error| error.to_string())? {
            Some(coupon) => write_line(format_args!("Removed {}", coupon.code))?,
            None => write_line("No coupon applied")?,
        },
    }

    let summary = ledger.summary();
    let discount =
        format_amount(summary.discount, storefront.currency).map_err(|error| error.to_string())?;
    let total =
        format_amount(summary.total, storefront.currency).map_err(|error| error.to_string())?;

    write_line(format_args!("Discount {discount}, total {total}"))
}
