//! The `xpends` command line interface.

use std::{
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use time::{Date, macros::format_description};

use crate::{
    Error,
    category::{CategoryDraft, CategoryId, DEFAULT_CATEGORY_COLOR},
    client::ApiClient,
    config::{Config, DEFAULT_API_URL, DEFAULT_TIMEZONE},
    dashboard::{render_dashboard, render_spending_summary},
    expense::{ExpenseDraft, ExpenseId},
    ledger::Ledger,
    month::YearMonth,
    person::{PersonDraft, PersonId, PersonType, Relation, associated_persons, find_by_rut},
    receipt::ReceiptFile,
    token::default_token_path,
    user::{ProfileUpdate, Registration, UserId, check_password_strength},
    views::{
        render_categories, render_expenses, render_persons, render_profile, render_scan_result,
        render_users,
    },
};

/// Track expenses, categories and the people you pay from the terminal.
#[derive(Parser, Debug)]
#[command(name = "xpends", version, about, long_about = None)]
pub struct Args {
    /// The base URL of the expense tracker API.
    #[arg(long, env = "XPENDS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// The file the session token is kept in [default: ~/.xpends_token].
    #[arg(long, env = "XPENDS_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// The canonical time zone used for "this month" and "today", e.g.
    /// "America/Santiago".
    #[arg(long, env = "XPENDS_TIMEZONE", default_value = DEFAULT_TIMEZONE, global = true)]
    pub timezone: String,

    /// Also write debug logs to this file.
    #[arg(long, global = true)]
    pub debug_log: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// The settings the flags and environment resolve to.
    pub fn config(&self) -> Config {
        Config {
            api_url: self.api_url.clone(),
            token_path: self.token_file.clone().unwrap_or_else(default_token_path),
            timezone: self.timezone.clone(),
        }
    }
}

/// The top level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and remember the session.
    Login {
        /// The user name. Prompted for when omitted.
        username: Option<String>,
    },

    /// Create an account.
    Register {
        /// The user name. Prompted for when omitted.
        #[arg(long)]
        username: Option<String>,

        /// The email address. Prompted for when omitted.
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Show spending totals and breakdowns by category, recipient and month.
    Dashboard {
        /// The month to total, as YYYY-MM. Defaults to the current month.
        #[arg(long)]
        month: Option<YearMonth>,

        /// Print the figures as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the total spent in each category.
    Summary,

    /// List, add, edit and delete expenses.
    #[command(subcommand)]
    Expenses(ExpenseCommand),

    /// List, add, edit and delete categories.
    #[command(subcommand)]
    Categories(CategoryCommand),

    /// List, add, edit and delete persons.
    #[command(subcommand)]
    Persons(PersonCommand),

    /// Manage user accounts (admins only).
    #[command(subcommand)]
    Users(UserCommand),

    /// Show or set your own person details.
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Read the amount and issuer from a receipt image or PDF.
    Scan {
        /// A JPEG, PNG, WebP, GIF, TIFF or PDF file of at most 10 MB.
        file: PathBuf,
    },
}

/// Expense commands.
#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    /// List expenses, newest first.
    List,

    /// Add an expense.
    Add {
        /// The expense details.
        #[command(flatten)]
        fields: ExpenseFields,

        /// Fill in the amount and provider from a scanned receipt.
        #[arg(long)]
        receipt: Option<PathBuf>,
    },

    /// Change an expense. Fields that are not given keep their value.
    Edit {
        /// The expense ID.
        id: ExpenseId,

        /// The fields to change.
        #[command(flatten)]
        fields: ExpenseFields,
    },

    /// Delete an expense.
    Delete {
        /// The expense ID.
        id: ExpenseId,
    },
}

/// The fields of the expense form.
#[derive(clap::Args, Debug, Default, Clone, PartialEq)]
pub struct ExpenseFields {
    /// A short description, e.g. "Groceries".
    #[arg(long)]
    pub title: Option<String>,

    /// The amount spent, at least 0.01.
    #[arg(long)]
    pub amount: Option<f64>,

    /// The category name.
    #[arg(long)]
    pub category: Option<String>,

    /// The day of the expense, as YYYY-MM-DD. Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<Date>,

    /// A free text note.
    #[arg(long)]
    pub note: Option<String>,

    /// The ID of the person that was paid.
    #[arg(long)]
    pub provider: Option<PersonId>,

    /// The ID of the associated person the money was spent on.
    #[arg(long)]
    pub recipient: Option<PersonId>,
}

impl ExpenseFields {
    /// Overwrite the fields of `draft` that were given.
    pub fn apply(self, draft: &mut ExpenseDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(amount) = self.amount {
            draft.amount = amount;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(note) = self.note {
            draft.note = Some(note);
        }
        if let Some(provider) = self.provider {
            draft.provider_id = Some(provider);
        }
        if let Some(recipient) = self.recipient {
            draft.recipient_id = Some(recipient);
        }
    }
}

/// Category commands.
#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories.
    List,

    /// Add a category.
    Add {
        /// The category name.
        name: String,

        /// A #rrggbb display color.
        #[arg(long, default_value = DEFAULT_CATEGORY_COLOR)]
        color: String,
    },

    /// Rename or recolor a category.
    Edit {
        /// The category ID.
        id: CategoryId,

        /// The new name.
        #[arg(long)]
        name: Option<String>,

        /// The new #rrggbb color.
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category.
    Delete {
        /// The category ID.
        id: CategoryId,
    },
}

/// Person commands.
#[derive(Subcommand, Debug)]
pub enum PersonCommand {
    /// List persons.
    List {
        /// Only list persons that can be recipients.
        #[arg(long)]
        associated: bool,
    },

    /// Add a person.
    Add {
        /// The full name or business name.
        name: String,

        /// Individual, Company or Government.
        #[arg(long = "type", default_value = "Individual")]
        kind: PersonType,

        /// The tax identifier, e.g. 12.345.678-9.
        #[arg(long)]
        rut: String,

        /// How the person relates to you: Self, Spouse, Child, Parent,
        /// Sibling or Other. Only related persons can be recipients.
        #[arg(long)]
        relation: Option<Relation>,
    },

    /// Change a person. Fields that are not given keep their value.
    Edit {
        /// The person ID.
        id: PersonId,

        /// The new name.
        #[arg(long)]
        name: Option<String>,

        /// The new type.
        #[arg(long = "type")]
        kind: Option<PersonType>,

        /// The new tax identifier.
        #[arg(long)]
        rut: Option<String>,

        /// The new relation.
        #[arg(long)]
        relation: Option<Relation>,

        /// Remove the relation.
        #[arg(long, conflicts_with = "relation")]
        no_relation: bool,
    },

    /// Delete a person.
    Delete {
        /// The person ID.
        id: PersonId,
    },
}

/// Account administration commands.
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List all accounts.
    List,

    /// Activate or deactivate an account.
    Activate {
        /// The user ID.
        id: UserId,
    },

    /// Make a user an admin, or an admin a regular user.
    Role {
        /// The user ID.
        id: UserId,
    },

    /// Delete an account and all of its data.
    Delete {
        /// The user ID.
        id: UserId,

        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

/// Profile commands.
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show your account and person details.
    Show,

    /// Set the person that represents you.
    Set {
        /// Your full name.
        #[arg(long)]
        name: String,

        /// Individual, Company or Government.
        #[arg(long = "type", default_value = "Individual")]
        kind: PersonType,

        /// Your tax identifier.
        #[arg(long)]
        rut: String,
    },
}

/// Run `args.command` against the configured API.
pub async fn run(args: Args) -> Result<(), Error> {
    let config = args.config();
    let use_color = io::stdout().is_terminal();

    match args.command {
        Command::Login { username } => login(&config, username).await,
        Command::Register { username, email } => register(&config, username, email).await,
        Command::Logout => {
            config.token_store().clear()?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            let user = config.authenticated_client()?.me().await?;
            println!("{} <{}> ({})", user.username, user.email, user.role());
            Ok(())
        }
        Command::Dashboard { month, json } => dashboard(&config, month, json, use_color).await,
        Command::Summary => {
            let ledger = Ledger::load(config.authenticated_client()?).await?;
            print!("{}", render_spending_summary(&ledger.spending_summary()));
            Ok(())
        }
        Command::Expenses(command) => expenses(&config, command).await,
        Command::Categories(command) => categories(&config, command, use_color).await,
        Command::Persons(command) => persons(&config, command).await,
        Command::Users(command) => users(&config, command).await,
        Command::Profile(command) => profile(&config, command).await,
        Command::Scan { file } => scan(&config, &file).await,
    }
}

async fn login(config: &Config, username: Option<String>) -> Result<(), Error> {
    let username = match username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    let mut client = config.client()?;
    let token = client.login(&username, &password).await?;
    config.token_store().save(&token)?;

    let user = client.me().await?;
    println!("Logged in as {}.", user.username);

    Ok(())
}

async fn register(
    config: &Config,
    username: Option<String>,
    email: Option<String>,
) -> Result<(), Error> {
    let username = match username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = prompt_new_password(&[&username, &email])?;

    let registration = Registration {
        username,
        email,
        password,
    }
    .validate()?;

    config.client()?.register(&registration).await?;
    println!(
        "Account created. Log in with `xpends login {}`.",
        registration.username
    );

    Ok(())
}

/// Ask for a password twice until it is strong enough and both entries match.
fn prompt_new_password(user_inputs: &[&str]) -> Result<String, Error> {
    loop {
        let first_password = rpassword::prompt_password("Password: ")?;

        if let Err(error) = check_password_strength(&first_password, user_inputs) {
            print_error(error);
            continue;
        }

        let second_password = rpassword::prompt_password("Confirm password: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Ok(first_password);
    }
}

async fn dashboard(
    config: &Config,
    month: Option<YearMonth>,
    json: bool,
    use_color: bool,
) -> Result<(), Error> {
    let month = match month {
        Some(month) => month,
        None => config.current_month()?,
    };

    let ledger = Ledger::load(config.authenticated_client()?).await?;
    let summary = ledger.dashboard(month);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_dashboard(&summary, use_color));
    }

    Ok(())
}

async fn expenses(config: &Config, command: ExpenseCommand) -> Result<(), Error> {
    let client = config.authenticated_client()?;

    match command {
        ExpenseCommand::List => {
            print!("{}", render_expenses(&client.fetch_expenses().await?));
        }
        ExpenseCommand::Add { fields, receipt } => {
            let mut ledger = Ledger::load(client).await?;
            let mut draft = ExpenseDraft::new("", 0.0, "", config.today()?);

            if let Some(path) = receipt {
                let receipt = ReceiptFile::open(&path)?;
                let scan = ledger.source().scan_receipt(&receipt).await?;
                let provider = draft.prefill_from_scan(&scan, ledger.persons());
                print!("{}", render_scan_result(&scan, provider));

                if let Some(provider_name) = scan.provider_name {
                    draft.title = provider_name;
                }
            }

            fields.apply(&mut draft);
            ledger.save_expense(draft, None).await?;
            println!("Expense saved.");
        }
        ExpenseCommand::Edit { id, fields } => {
            let mut ledger = Ledger::load(client).await?;
            let mut draft = ExpenseDraft::from(ledger.expense(id)?);

            fields.apply(&mut draft);
            ledger.save_expense(draft, Some(id)).await?;
            println!("Expense {id} saved.");
        }
        ExpenseCommand::Delete { id } => {
            let mut ledger = Ledger::load(client).await?;
            ledger.expense(id)?;

            ledger.delete_expense(id).await?;
            println!("Expense {id} deleted.");
        }
    }

    Ok(())
}

async fn categories(
    config: &Config,
    command: CategoryCommand,
    use_color: bool,
) -> Result<(), Error> {
    let client = config.authenticated_client()?;

    match command {
        CategoryCommand::List => {
            let categories = client.fetch_categories().await?;
            print!("{}", render_categories(&categories, use_color));
        }
        CategoryCommand::Add { name, color } => {
            let mut ledger = Ledger::load(client).await?;
            ledger.save_category(CategoryDraft { name, color }, None).await?;
            print!("{}", render_categories(ledger.categories(), use_color));
        }
        CategoryCommand::Edit { id, name, color } => {
            let mut ledger = Ledger::load(client).await?;
            let mut draft = CategoryDraft::from(ledger.category(id)?);

            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(color) = color {
                draft.color = color;
            }

            ledger.save_category(draft, Some(id)).await?;
            print!("{}", render_categories(ledger.categories(), use_color));
        }
        CategoryCommand::Delete { id } => {
            let mut ledger = Ledger::load(client).await?;
            ledger.category(id)?;

            ledger.delete_category(id).await?;
            println!("Category {id} deleted.");
        }
    }

    Ok(())
}

async fn persons(config: &Config, command: PersonCommand) -> Result<(), Error> {
    let client = config.authenticated_client()?;

    match command {
        PersonCommand::List { associated } => {
            let persons = client.fetch_persons().await?;

            if associated {
                print!("{}", render_persons(associated_persons(&persons)));
            } else {
                print!("{}", render_persons(&persons));
            }
        }
        PersonCommand::Add {
            name,
            kind,
            rut,
            relation,
        } => {
            let mut ledger = Ledger::load(client).await?;
            let draft = PersonDraft {
                name,
                kind,
                rut,
                relation,
            };

            ledger.save_person(draft, None).await?;
            print!("{}", render_persons(ledger.persons()));
        }
        PersonCommand::Edit {
            id,
            name,
            kind,
            rut,
            relation,
            no_relation,
        } => {
            let mut ledger = Ledger::load(client).await?;
            let mut draft = PersonDraft::from(ledger.person(id)?);

            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(kind) = kind {
                draft.kind = kind;
            }
            if let Some(rut) = rut {
                draft.rut = rut;
            }
            if relation.is_some() || no_relation {
                draft.relation = relation;
            }

            ledger.save_person(draft, Some(id)).await?;
            print!("{}", render_persons(ledger.persons()));
        }
        PersonCommand::Delete { id } => {
            let mut ledger = Ledger::load(client).await?;
            ledger.person(id)?;

            ledger.delete_person(id).await?;
            println!("Person {id} deleted.");
        }
    }

    Ok(())
}

async fn users(config: &Config, command: UserCommand) -> Result<(), Error> {
    let client = config.authenticated_client()?;

    match command {
        UserCommand::List => {
            let me = client.me().await?;
            let users = client.list_users().await?;
            print!("{}", render_users(&users, me.id));
        }
        UserCommand::Activate { id } => {
            refuse_own_account(&client, id).await?;
            let user = client.toggle_active(id).await?;
            let status = if user.is_active { "active" } else { "inactive" };
            println!("{} is now {status}.", user.username);
        }
        UserCommand::Role { id } => {
            refuse_own_account(&client, id).await?;
            let user = client.toggle_role(id).await?;
            let role = if user.is_admin { "an admin" } else { "a regular user" };
            println!("{} is now {role}.", user.username);
        }
        UserCommand::Delete { id, yes } => {
            refuse_own_account(&client, id).await?;

            if !yes && !confirm(&format!("Delete user {id} and all of their data?"))? {
                println!("Cancelled.");
                return Ok(());
            }

            client.delete_user(id).await?;
            println!("User {id} deleted.");
        }
    }

    Ok(())
}

/// Admins manage other accounts, never their own.
async fn refuse_own_account(client: &ApiClient, id: UserId) -> Result<(), Error> {
    let me = client.me().await?;

    if me.id == id {
        Err(Error::SelfModification)
    } else {
        Ok(())
    }
}

async fn profile(config: &Config, command: ProfileCommand) -> Result<(), Error> {
    let client = config.authenticated_client()?;

    let user = match command {
        ProfileCommand::Show => client.profile().await?,
        ProfileCommand::Set { name, kind, rut } => {
            let update = ProfileUpdate { name, kind, rut }.validate()?;
            client.update_profile(&update).await?
        }
    };

    print!("{}", render_profile(&user));

    Ok(())
}

async fn scan(config: &Config, file: &Path) -> Result<(), Error> {
    let receipt = ReceiptFile::open(file)?;
    let client = config.authenticated_client()?;

    let scan = client.scan_receipt(&receipt).await?;
    let persons = client.fetch_persons().await?;
    let provider = scan
        .rut
        .as_deref()
        .and_then(|rut| find_by_rut(&persons, rut));

    print!("{}", render_scan_result(&scan, provider));

    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn prompt(label: &str) -> Result<String, Error> {
    print!("{label}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    Ok(answer.trim().to_owned())
}

fn confirm(question: &str) -> Result<bool, Error> {
    let answer = prompt(&format!("{question} [y/N] "))?;

    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Print `error` in bold red to stderr.
pub fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
