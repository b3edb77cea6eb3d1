//! Sort/Rank Engine
//!
//! Orders accounts for the utilization table. Product-based sorts rank first by
//! pacing severity and then by usage percentage; the end-date sort surfaces the
//! soonest renewals. Accounts whose targeted product has no positive cap or no end
//! date carry no meaningful status and always sink to the bottom, whatever order
//! was requested. All sorts are stable so equal entries keep their import order.
//!
//! Sorting by account name or owner is a separate, exclusive mode that ignores
//! product data entirely; [`sorted_view`] resolves which applies from the
//! [`ViewState`].

use crate::models::{Account, AccountingMode, ProductSubscription, SortMode, ViewState};
use crate::products::same_product;
use crate::status::calculate_utilization;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Find an account's subscription for a product, matching across aliases.
pub fn find_product<'a>(account: &'a Account, name: &str) -> Option<&'a ProductSubscription> {
    account.products.iter().find(|p| same_product(&p.name, name))
}

/// Rank accounts by a product-targeted sort mode.
///
/// `as_of` is the explicit "now" used for pacing classification. `Name`/`Owner`
/// modes are accepted and fall through to their column compare so callers can pass
/// any [`SortMode`].
pub fn rank_accounts(
    accounts: &mut Vec<Account>,
    product: &str,
    sort: SortMode,
    mode: AccountingMode,
    as_of: Option<NaiveDate>,
) {
    accounts.sort_by(|a, b| compare_accounts(a, b, product, sort, mode, as_of));
}

fn compare_accounts(
    a: &Account,
    b: &Account,
    product: &str,
    sort: SortMode,
    mode: AccountingMode,
    as_of: Option<NaiveDate>,
) -> Ordering {
    match sort {
        SortMode::Name => return compare_ci(&a.name, &b.name),
        SortMode::Owner => return compare_ci(&a.account_owner, &b.account_owner),
        _ => {}
    }

    let product_a = find_product(a, product);
    let product_b = find_product(b, product);

    let valid_a = product_a.map(|p| p.has_valid_data()).unwrap_or(false);
    let valid_b = product_b.map(|p| p.has_valid_data()).unwrap_or(false);

    // Invalid data always sinks; two invalid accounts stay in import order.
    match (valid_a, valid_b) {
        (false, true) => return Ordering::Greater,
        (true, false) => return Ordering::Less,
        (false, false) => return Ordering::Equal,
        (true, true) => {}
    }

    let sub_a = product_a.expect("valid product present");
    let sub_b = product_b.expect("valid product present");

    match sort {
        SortMode::UsageDesc => compare_usage(sub_a, sub_b, mode, as_of).reverse(),
        SortMode::UsageAsc => compare_usage(sub_a, sub_b, mode, as_of),
        SortMode::EndDate => sub_a.contract_end.cmp(&sub_b.contract_end),
        SortMode::Name | SortMode::Owner => Ordering::Equal,
    }
}

/// Ascending compare: severity rank first, usage percentage second.
fn compare_usage(
    a: &ProductSubscription,
    b: &ProductSubscription,
    mode: AccountingMode,
    as_of: Option<NaiveDate>,
) -> Ordering {
    let severity_a = product_severity(a, mode, as_of);
    let severity_b = product_severity(b, mode, as_of);

    severity_a.cmp(&severity_b).then_with(|| {
        a.usage_percent()
            .partial_cmp(&b.usage_percent())
            .unwrap_or(Ordering::Equal)
    })
}

fn product_severity(sub: &ProductSubscription, mode: AccountingMode, as_of: Option<NaiveDate>) -> u8 {
    calculate_utilization(
        sub.current,
        sub.contracted,
        sub.contract_start,
        as_of.or(sub.usage_date),
        mode,
        sub.contract_end,
    )
    .status
    .severity()
}

/// Produce the displayed account ordering for a view: owner filter applied, then
/// either the active column sort or the active product sort.
pub fn sorted_view(accounts: &[Account], view: &ViewState) -> Vec<Account> {
    let mut visible: Vec<Account> = accounts
        .iter()
        .filter(|a| {
            view.selected_owners.is_empty()
                || view
                    .selected_owners
                    .iter()
                    .any(|o| o.eq_ignore_ascii_case(&a.account_owner))
        })
        .cloned()
        .collect();

    match view.sort {
        SortMode::Name => visible.sort_by(|a, b| compare_ci(&a.name, &b.name)),
        SortMode::Owner => {
            visible.sort_by(|a, b| compare_ci(&a.account_owner, &b.account_owner))
        }
        product_sort => {
            if let Some(product) = &view.sort_product {
                rank_accounts(&mut visible, product, product_sort, view.mode, view.as_of);
            }
        }
    }

    visible
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
