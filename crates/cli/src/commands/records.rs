//! List, create, edit, and delete commands for the four record kinds.
//!
//! # Usage
//!
//! ```bash
//! hw-cli clients list --query "boa vista"
//! hw-cli companies create --legal-name "Agro Ltda" --tax-id 12.345.678/0001-90
//! hw-cli products edit 42 --alert-threshold 5
//! hw-cli users delete 7 --yes
//! ```
//!
//! Create and edit go through the same form state as the admin panel, so
//! validation messages and notices read the same.

use clap::Args;
use homeoware_admin::resources::fetch_one;
use homeoware_admin::{AssumeYes, Confirm, DeleteOutcome, FormState, ListState, Lists, Resource};
use homeoware_core::listing::{self, Searchable};
use homeoware_core::validation::fields;
use homeoware_core::{
    ClientRecord, CompanyRecord, FormInput, ProductRecord, RecordId, RecordKind, SortKey,
    UserRecord,
};

use super::{CommandError, Context, TerminalConfirm, emit, report};

/// Per-kind flags and list access.
pub trait KindFields {
    type Record: Resource + Searchable + Row;

    const KIND: RecordKind;

    /// Field path and value of every flag that was given.
    fn values(&self) -> Vec<(&'static str, &str)>;

    fn list(lists: &Lists) -> &ListState<Self::Record>;

    /// Sort in place. Returns `false` when this kind has no sort order.
    fn sort(_records: &mut [&Self::Record], _key: SortKey) -> bool {
        false
    }
}

/// One-line rendering and edit defaults of a record.
pub trait Row {
    fn row(&self) -> String;
    fn defaults(&self) -> FormInput;
}

// =============================================================================
// Flags
// =============================================================================

#[derive(Args)]
pub struct UserFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// `administrator`, `salesperson`, or `veterinarian`
    #[arg(long)]
    role: Option<String>,

    /// Required on create and edit
    #[arg(long, env = "HW_USER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
pub struct ClientFields {
    #[arg(long)]
    name: Option<String>,

    /// CPF or CNPJ
    #[arg(long)]
    document: Option<String>,
}

#[derive(Args)]
pub struct CompanyFields {
    #[arg(long)]
    legal_name: Option<String>,

    #[arg(long)]
    tax_id: Option<String>,
}

#[derive(Args)]
pub struct ProductFields {
    /// Product code (sent as the record id)
    #[arg(long)]
    identifier: Option<String>,

    #[arg(long)]
    name: Option<String>,

    /// `homeopathy`, `phytotherapy`, or `dermocosmetic`
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    initial_stock: Option<String>,

    #[arg(long)]
    alert_threshold: Option<String>,
}

fn given<'a>(pairs: &[(&'static str, Option<&'a String>)]) -> Vec<(&'static str, &'a str)> {
    pairs
        .iter()
        .filter_map(|&(path, value)| value.map(|v| (path, v.as_str())))
        .collect()
}

impl KindFields for UserFields {
    type Record = UserRecord;

    const KIND: RecordKind = RecordKind::User;

    fn values(&self) -> Vec<(&'static str, &str)> {
        given(&[
            (fields::NAME, self.name.as_ref()),
            (fields::EMAIL, self.email.as_ref()),
            (fields::ROLE, self.role.as_ref()),
            (fields::PASSWORD, self.password.as_ref()),
            (fields::NOTES, self.notes.as_ref()),
        ])
    }

    fn list(lists: &Lists) -> &ListState<UserRecord> {
        &lists.users
    }
}

impl KindFields for ClientFields {
    type Record = ClientRecord;

    const KIND: RecordKind = RecordKind::Client;

    fn values(&self) -> Vec<(&'static str, &str)> {
        given(&[
            (fields::NAME, self.name.as_ref()),
            (fields::DOCUMENT, self.document.as_ref()),
        ])
    }

    fn list(lists: &Lists) -> &ListState<ClientRecord> {
        &lists.clients
    }
}

impl KindFields for CompanyFields {
    type Record = CompanyRecord;

    const KIND: RecordKind = RecordKind::Company;

    fn values(&self) -> Vec<(&'static str, &str)> {
        given(&[
            (fields::LEGAL_NAME, self.legal_name.as_ref()),
            (fields::TAX_ID, self.tax_id.as_ref()),
        ])
    }

    fn list(lists: &Lists) -> &ListState<CompanyRecord> {
        &lists.companies
    }
}

impl KindFields for ProductFields {
    type Record = ProductRecord;

    const KIND: RecordKind = RecordKind::Product;

    fn values(&self) -> Vec<(&'static str, &str)> {
        given(&[
            (fields::IDENTIFIER, self.identifier.as_ref()),
            (fields::NAME, self.name.as_ref()),
            (fields::CATEGORY, self.category.as_ref()),
            (fields::INITIAL_STOCK, self.initial_stock.as_ref()),
            (fields::ALERT_THRESHOLD, self.alert_threshold.as_ref()),
        ])
    }

    fn list(lists: &Lists) -> &ListState<ProductRecord> {
        &lists.products
    }

    fn sort(records: &mut [&ProductRecord], key: SortKey) -> bool {
        listing::sort(records, key);
        true
    }
}

// =============================================================================
// Rows
// =============================================================================

impl Row for UserRecord {
    fn row(&self) -> String {
        format!("{}\t{}\t{}\t{}", self.id, self.name, self.email, self.role)
    }

    fn defaults(&self) -> FormInput {
        FormInput::from(self)
    }
}

impl Row for ClientRecord {
    fn row(&self) -> String {
        format!("{}\t{}\t{}", self.id, self.name, self.document)
    }

    fn defaults(&self) -> FormInput {
        FormInput::from(self)
    }
}

impl Row for CompanyRecord {
    fn row(&self) -> String {
        format!("{}\t{}\t{}", self.id, self.legal_name, self.tax_id)
    }

    fn defaults(&self) -> FormInput {
        FormInput::from(self)
    }
}

impl Row for ProductRecord {
    fn row(&self) -> String {
        let flag = if self.is_low_stock() { "\tLOW STOCK" } else { "" };
        format!(
            "{}\t{}\t{}\t{}\t{}{flag}",
            self.id,
            self.name,
            self.category.as_deref().unwrap_or("-"),
            self.quantity,
            self.created_at.format("%Y-%m-%d"),
        )
    }

    fn defaults(&self) -> FormInput {
        FormInput::from(self)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Load the list, then print the filtered (and for products, sorted) view.
pub async fn list<F: KindFields>(
    ctx: &Context,
    query: &str,
    sort: Option<SortKey>,
) -> Result<(), CommandError> {
    let list = F::list(&ctx.lists);
    list.load(&ctx.api).await?;
    let records = list.snapshot().await;

    let mut visible = listing::filter(&records, query);
    if let Some(key) = sort
        && !F::sort(&mut visible, key)
    {
        tracing::warn!("Sorting applies to products only; showing {} in server order", F::KIND);
    }

    for record in &visible {
        emit(record.row());
    }
    tracing::info!(
        shown = visible.len(),
        total = records.len(),
        "Listed {} records",
        F::KIND
    );
    Ok(())
}

fn apply<F: KindFields>(form: &mut FormState, flags: &F) {
    for (path, value) in flags.values() {
        // Paths come from the field table of the same kind
        let known = form.set_field(path, value);
        debug_assert!(known, "unknown field {path}");
    }
}

async fn submit(ctx: &Context, form: &mut FormState) -> Result<(), CommandError> {
    let outcome = form.submit(&ctx.api, &ctx.lists, || {}).await;
    if let Some(notice) = form.take_notice() {
        report(&notice);
    }
    if let Some(id) = outcome?.record() {
        emit(id);
    }
    Ok(())
}

/// Create a record from the given flags.
pub async fn create<F: KindFields>(ctx: &Context, flags: &F) -> Result<(), CommandError> {
    let mut form = FormState::new(F::KIND);
    form.open_create(F::KIND);
    apply(&mut form, flags);
    submit(ctx, &mut form).await
}

/// Fetch the record, overlay the given flags, and save.
pub async fn edit<F: KindFields>(ctx: &Context, id: &RecordId, flags: &F) -> Result<(), CommandError> {
    let record: F::Record = fetch_one(&ctx.api, id).await?;

    let mut form = FormState::new(F::KIND);
    form.open_edit(id.clone(), record.defaults());
    apply(&mut form, flags);
    submit(ctx, &mut form).await
}

/// Delete after confirmation. A record that is already gone is not an error.
pub async fn delete<F: KindFields>(ctx: &Context, id: &RecordId, yes: bool) -> Result<(), CommandError> {
    let confirm: &dyn Confirm = if yes { &AssumeYes } else { &TerminalConfirm };

    let mut form = FormState::new(F::KIND);
    form.open_edit(id.clone(), FormInput::empty(F::KIND));
    let outcome = form.delete(&ctx.api, &ctx.lists, confirm).await;
    if let Some(notice) = form.take_notice() {
        report(&notice);
    }
    if outcome? == DeleteOutcome::Cancelled {
        tracing::info!("Cancelled");
    }
    Ok(())
}
