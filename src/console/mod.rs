//! Console layer - The line-oriented administration console.
//!
//! The console mounts onto a bus and a shared store: it attaches the store's
//! subscriptions, starts the header clock, and from then on turns each input
//! line into core operations and a rendered reply. Teardown detaches the store
//! and cancels both timers.

/// Line command parsing
pub mod command;
/// Toast notices and the header clock
pub mod notice;
/// Screen rendering
pub mod render;

use crate::{
    config::display::DisplayConfig,
    core::{
        auth::{LoginFlow, LoginStep},
        bus::NotificationBus,
        member::{self, MemberForm},
        report::MonthPeriod,
        store::{SharedStore, StoreSubscriptions, attach},
        transaction::Confirmation,
    },
    entities::{Profile, Role, TransactionKind},
    errors::{Error, Result},
};
use chrono::FixedOffset;
use command::Command;
use notice::{Clock, Notices, Toast, format_clock};
use tracing::{debug, info};

/// Navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Landing view after login
    Dashboard,
    /// Employee balances and monthly movements
    EmployeeStatus,
    /// Monthly statement
    AllData,
    /// Transaction feed ("History" for employees)
    Activities,
    /// Profile registry
    UserManagement,
}

impl Tab {
    /// Every tab in sidebar order
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::EmployeeStatus,
        Self::AllData,
        Self::Activities,
        Self::UserManagement,
    ];

    /// Accepts a tab title or a short alias, ignoring case.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "dashboard" | "home" => Some(Self::Dashboard),
            "employee status" | "status" => Some(Self::EmployeeStatus),
            "all data" | "data" | "statement" => Some(Self::AllData),
            "activities" | "activity" | "history" => Some(Self::Activities),
            "user management" | "users" => Some(Self::UserManagement),
            _ => None,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::EmployeeStatus => "Employee Status",
            Self::AllData => "All Data",
            Self::Activities => "Activities",
            Self::UserManagement => "User Management",
        }
    }

    /// Title as shown to `role`
    #[must_use]
    pub const fn title_for(self, role: Role) -> &'static str {
        match (self, role) {
            (Self::Activities, Role::Employee) => "History",
            _ => self.title(),
        }
    }

    /// Employees only see the dashboard and their own history.
    #[must_use]
    pub const fn allowed_for(self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Employee => matches!(self, Self::Dashboard | Self::Activities),
        }
    }
}

/// Output of one input line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Lines to print
    pub lines: Vec<String>,
    /// Whether the user asked to leave
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

/// Session-scoped console state mounted on a bus and a store.
#[derive(Debug)]
pub struct Console {
    bus: NotificationBus,
    store: SharedStore,
    subscriptions: Option<StoreSubscriptions>,
    offset: FixedOffset,
    login: LoginFlow,
    tab: Tab,
    confirmation: Confirmation,
    pending_delete: Option<Profile>,
    period: MonthPeriod,
    notices: Notices,
    clock: Clock,
}

impl Console {
    /// Attaches `store` to `bus` and starts the clock. Must run inside a tokio runtime.
    pub fn mount(
        bus: &NotificationBus,
        store: SharedStore,
        display: &DisplayConfig,
    ) -> Result<Self> {
        display.validate()?;
        let offset = display.offset()?;
        let period = MonthPeriod::new(display.statement_year, display.statement_month, offset)
            .ok_or_else(|| Error::Config {
                message: format!("statement_month out of range: {}", display.statement_month),
            })?;

        let subscriptions = attach(bus, &store);
        info!("Console mounted");
        Ok(Self {
            bus: bus.clone(),
            store,
            subscriptions: Some(subscriptions),
            offset,
            login: LoginFlow::new(),
            tab: Tab::Dashboard,
            confirmation: Confirmation::default(),
            pending_delete: None,
            period,
            notices: Notices::new(display.toast_delay()),
            clock: Clock::start(display.clock_tick()),
        })
    }

    /// Detaches the store and cancels the clock and toast timers.
    pub fn teardown(&mut self) {
        if let Some(subscriptions) = self.subscriptions.take() {
            subscriptions.detach();
        }
        self.clock.stop();
        self.notices.stop();
        info!("Console torn down");
    }

    #[must_use]
    pub const fn store(&self) -> &SharedStore {
        &self.store
    }

    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    #[must_use]
    pub const fn period(&self) -> &MonthPeriod {
        &self.period
    }

    #[must_use]
    pub const fn login_step(&self) -> &LoginStep {
        self.login.step()
    }

    #[must_use]
    pub const fn confirmation(&self) -> &Confirmation {
        &self.confirmation
    }

    #[must_use]
    pub fn session(&self) -> Option<Profile> {
        self.store.read().session().cloned()
    }

    /// Toast currently on screen
    #[must_use]
    pub fn notice(&self) -> Option<Toast> {
        self.notices.current()
    }

    /// Prompt for the next input line
    #[must_use]
    pub fn prompt(&self) -> String {
        if self.session().is_none() {
            return match self.login.step() {
                LoginStep::Identity => "ID or email> ".to_string(),
                LoginStep::Pin { .. } => "PIN> ".to_string(),
            };
        }
        if let Some(pending) = self.confirmation.pending() {
            return format!("{} amount for {}> ", pending.kind, pending.full_name);
        }
        if let Some(target) = &self.pending_delete {
            return format!("delete {}? (yes/no)> ", target.id);
        }
        "fund> ".to_string()
    }

    /// Handles one input line and renders the reply.
    ///
    /// A toast raised while handling the line is placed first in the reply.
    pub fn handle(&mut self, line: &str) -> Reply {
        let raised = self.notices.raised();
        let mut reply = match self.session() {
            None => self.handle_login(line),
            Some(actor) => self.handle_session(&actor, line),
        };
        if self.notices.raised() != raised {
            if let Some(toast) = self.notices.current() {
                reply.lines.insert(0, toast.render());
            }
        }
        reply
    }

    fn handle_login(&mut self, line: &str) -> Reply {
        let input = line.trim();
        if matches!(input.to_lowercase().as_str(), "quit" | "exit") {
            return Reply {
                lines: Vec::new(),
                quit: true,
            };
        }

        let profiles = self.store.read().profiles().to_vec();
        match self.login.step().clone() {
            LoginStep::Identity => match self.login.submit_identity(&profiles, input) {
                Ok(()) => Reply::line("Identity verified. Enter PIN (or 'back')."),
                Err(e) => Reply::line(format!("! {e}")),
            },
            LoginStep::Pin { .. } if input.eq_ignore_ascii_case("back") => {
                self.login.back();
                Reply::line("Enter ID or email.")
            }
            LoginStep::Pin { .. } => match self.login.submit_pin(&profiles, input) {
                Ok(profile) => {
                    let greeting = format!("Access Granted: Welcome {}", profile.full_name);
                    self.store.write().begin_session(profile.clone());
                    self.tab = Tab::Dashboard;
                    self.notices.success(greeting);
                    Reply::lines(self.render_tab(&profile))
                }
                Err(e) => Reply::line(format!("! {e}")),
            },
        }
    }

    fn handle_session(&mut self, actor: &Profile, line: &str) -> Reply {
        if self.confirmation.is_open() {
            return self.handle_amount_entry(actor, line);
        }
        if self.pending_delete.is_some() {
            return self.handle_delete_confirmation(actor, line);
        }

        match command::parse(line) {
            Ok(command) => self.dispatch(actor, command),
            Err(e) => Reply::line(format!("! {e}")),
        }
    }

    fn dispatch(&mut self, actor: &Profile, command: Command) -> Reply {
        debug!(actor = %actor.id, ?command, "Dispatching command");
        match command {
            Command::Help => Reply::lines(help(actor.role)),
            Command::Show => Reply::lines(self.render_tab(actor)),
            Command::Open(tab) => self.open_tab(actor, tab),
            Command::Transact {
                kind,
                profile_id,
                amount,
            } => self.start_transaction(actor, kind, &profile_id, amount.as_deref()),
            Command::History(profile_id) => self.show_history(actor, &profile_id),
            Command::DueList => self.admin_view(actor, "viewing the due list", render::due_list),
            Command::MemberPool => {
                self.admin_view(actor, "viewing the member pool", render::member_pool)
            }
            Command::Month { month, year } => self.select_month(actor, month, year),
            Command::Register(form) => self.save(actor, &form, None),
            Command::Edit { profile_id, fields } => self.edit(actor, &profile_id, &fields),
            Command::Delete(profile_id) => self.initiate_delete(actor, &profile_id),
            Command::Confirm | Command::Cancel => Reply::line("Nothing to confirm."),
            Command::Logout => self.logout(),
            Command::Quit => Reply {
                lines: vec!["Goodbye.".to_string()],
                quit: true,
            },
        }
    }

    /// Authorization failures become error toasts; everything else is shown inline.
    fn report(&mut self, error: Error) -> Reply {
        match error {
            Error::Unauthorized { .. } | Error::ProtectedProfile { .. } => {
                self.notices.error(error.to_string());
                Reply::default()
            }
            other => Reply::line(format!("! {other}")),
        }
    }

    fn require_admin(&mut self, actor: &Profile, action: &'static str) -> Option<Reply> {
        if actor.is_admin() {
            None
        } else {
            Some(self.report(Error::Unauthorized { action }))
        }
    }

    fn open_tab(&mut self, actor: &Profile, tab: Tab) -> Reply {
        if !tab.allowed_for(actor.role) {
            return self.report(Error::Unauthorized {
                action: tab.title(),
            });
        }
        self.tab = tab;
        Reply::lines(self.render_tab(actor))
    }

    fn admin_view(
        &mut self,
        actor: &Profile,
        action: &'static str,
        view: fn(&[Profile]) -> Vec<String>,
    ) -> Reply {
        if let Some(refusal) = self.require_admin(actor, action) {
            return refusal;
        }
        Reply::lines(view(self.store.read().profiles()))
    }

    fn start_transaction(
        &mut self,
        actor: &Profile,
        kind: TransactionKind,
        profile_id: &str,
        amount: Option<&str>,
    ) -> Reply {
        if let Some(refusal) = self.require_admin(actor, "posting a transaction") {
            return refusal;
        }
        let Some(target) = self.store.read().profile(profile_id).cloned() else {
            return self.report(Error::ProfileNotFound {
                id: profile_id.to_string(),
            });
        };

        self.confirmation.open(&target, kind);
        match amount {
            Some(amount) => self.handle_amount_entry(actor, amount),
            None => Reply::line(format!(
                "Enter {kind} amount for {} (or 'cancel').",
                target.full_name
            )),
        }
    }

    fn handle_amount_entry(&mut self, actor: &Profile, line: &str) -> Reply {
        let input = line.trim();
        if matches!(input.to_lowercase().as_str(), "cancel" | "no" | "n") {
            self.confirmation.close();
            return Reply::line("Transaction cancelled.");
        }
        if !input.eq_ignore_ascii_case("confirm") {
            if let Err(e) = self.confirmation.enter_amount(input) {
                return self.report(e);
            }
        }

        match self.confirmation.confirm(&self.bus, &self.store) {
            Ok(transaction) => {
                self.notices.success("Transaction Finalized Successfully");
                let mut lines = vec![format!(
                    "Recorded {} ({} {})",
                    transaction.id,
                    transaction.kind,
                    render::format_money(transaction.amount)
                )];
                let actor = self.session().unwrap_or_else(|| actor.clone());
                lines.extend(self.render_tab(&actor));
                Reply::lines(lines)
            }
            Err(e @ Error::ProfileNotFound { .. }) => {
                self.confirmation.close();
                self.report(e)
            }
            Err(e) => self.report(e),
        }
    }

    fn show_history(&mut self, actor: &Profile, profile_id: &str) -> Reply {
        if !actor.is_admin() && !actor.id.eq_ignore_ascii_case(profile_id) {
            return self.report(Error::Unauthorized {
                action: "viewing another member's history",
            });
        }
        let store = self.store.read();
        let Some(profile) = store
            .profiles()
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(profile_id))
        else {
            drop(store);
            return self.report(Error::ProfileNotFound {
                id: profile_id.to_string(),
            });
        };
        Reply::lines(render::history(profile, store.transactions(), self.offset))
    }

    fn select_month(&mut self, actor: &Profile, month: u32, year: Option<i32>) -> Reply {
        let year = year.unwrap_or(self.period.year);
        match MonthPeriod::new(year, month, self.offset) {
            Some(period) => {
                self.period = period;
                let mut lines = vec![format!("Period set to {}", period.label())];
                lines.extend(self.render_tab(actor));
                Reply::lines(lines)
            }
            None => Reply::line(format!("! Month must be between 1 and 12, got {month}")),
        }
    }

    fn save(&mut self, actor: &Profile, form: &MemberForm, editing: Option<&Profile>) -> Reply {
        match member::save_member(&self.bus, &self.store, actor, form, editing) {
            Ok(saved) => {
                self.notices
                    .success(format!("Registry Updated: {}", saved.full_name));
                let actor = self.session().unwrap_or_else(|| actor.clone());
                Reply::lines(self.render_tab(&actor))
            }
            Err(e) => self.report(e),
        }
    }

    fn edit(&mut self, actor: &Profile, profile_id: &str, fields: &[(String, String)]) -> Reply {
        if let Some(refusal) = self.require_admin(actor, "editing a member") {
            return refusal;
        }
        let Some(existing) = self.store.read().profile(profile_id).cloned() else {
            return self.report(Error::ProfileNotFound {
                id: profile_id.to_string(),
            });
        };

        let mut form = MemberForm::from_profile(&existing);
        if let Err(e) = command::apply_fields(&mut form, fields) {
            return self.report(e);
        }
        self.save(actor, &form, Some(&existing))
    }

    fn initiate_delete(&mut self, actor: &Profile, profile_id: &str) -> Reply {
        match member::initiate_delete(&self.store, actor, profile_id) {
            Ok(target) => {
                let prompt = format!(
                    "Delete {} ({})? This cannot be undone. (yes/no)",
                    target.full_name, target.id
                );
                self.pending_delete = Some(target);
                Reply::line(prompt)
            }
            Err(e) => self.report(e),
        }
    }

    fn handle_delete_confirmation(&mut self, actor: &Profile, line: &str) -> Reply {
        let Some(target) = self.pending_delete.take() else {
            return Reply::default();
        };
        match command::parse(line) {
            Ok(Command::Confirm) => {
                match member::delete_member(&self.bus, &self.store, actor, &target.id) {
                    Ok(removed) => {
                        self.notices
                            .success(format!("Personnel Purged: {}", removed.full_name));
                        match self.session() {
                            Some(actor) => Reply::lines(self.render_tab(&actor)),
                            None => Reply::line("Your profile was removed. Session ended."),
                        }
                    }
                    Err(e) => self.report(e),
                }
            }
            Ok(Command::Cancel) => Reply::line("Deletion cancelled."),
            _ => {
                let prompt = format!("Answer 'yes' or 'no' to delete {}.", target.id);
                self.pending_delete = Some(target);
                Reply::line(prompt)
            }
        }
    }

    fn logout(&mut self) -> Reply {
        self.store.write().end_session();
        self.tab = Tab::Dashboard;
        self.confirmation.close();
        self.pending_delete = None;
        self.login.back();
        Reply::line("Logged out. Enter ID or email.")
    }

    /// Renders the current tab for `actor`, falling back to the dashboard if
    /// the tab is not available to their role.
    fn render_tab(&mut self, actor: &Profile) -> Vec<String> {
        if !self.tab.allowed_for(actor.role) {
            self.tab = Tab::Dashboard;
        }

        let store = self.store.read();
        let mut lines = vec![
            format!(
                "== {} == {} (GMT{:+})",
                self.tab.title_for(actor.role),
                format_clock(self.clock.now(), self.offset),
                self.offset.local_minus_utc() / 3600
            ),
            format!("Signed in as {} [{}]", actor.full_name, actor.role),
        ];

        let content = match (self.tab, actor.role) {
            (Tab::Dashboard, Role::Admin) => render::admin_dashboard(store.profiles()),
            (Tab::Dashboard, Role::Employee) => {
                render::employee_dashboard(actor, store.transactions(), self.offset)
            }
            (Tab::EmployeeStatus, _) => {
                render::employee_status(store.profiles(), store.transactions(), &self.period)
            }
            (Tab::AllData, _) => {
                render::monthly_statement(store.profiles(), store.transactions(), &self.period)
            }
            (Tab::Activities, Role::Admin) => {
                render::activities(store.profiles(), store.transactions(), self.offset)
            }
            (Tab::Activities, Role::Employee) => render::activities(
                store.profiles(),
                store
                    .transactions()
                    .iter()
                    .filter(|t| t.profile_id == actor.id),
                self.offset,
            ),
            (Tab::UserManagement, _) => render::user_management(store.profiles()),
        };
        lines.extend(content);
        lines
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        if self.subscriptions.is_some() {
            self.teardown();
        }
    }
}

fn help(role: Role) -> Vec<String> {
    let mut lines = vec![
        "tab <dashboard|activities>   switch view".to_string(),
        "history <id>                 member transaction history".to_string(),
        "show                         redraw the current view".to_string(),
        "logout | quit".to_string(),
    ];
    if role == Role::Admin {
        lines.extend([
            "tab <status|data|users>      admin views".to_string(),
            "deposit <id> [amount]        record a deposit".to_string(),
            "withdraw <id> [amount]       record a withdrawal".to_string(),
            "due | pool                   debtors / all employees".to_string(),
            "month <1-12> [year]          statement period".to_string(),
            "register name=..; email=..; pin=..[; id=..][; balance=..]".to_string(),
            "edit <id> key=value; ...     update a member".to_string(),
            "delete <id>                  remove a member".to_string(),
        ]);
    }
    lines
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::seed::Seed;
    use crate::core::report;
    use crate::core::store::ViewStore;
    use crate::entities::ROOT_ADMIN_ID;
    use crate::test_utils::gmt6;
    use notice::ToastKind;
    use std::time::Duration;

    fn mounted() -> Console {
        let bus = NotificationBus::new();
        let store = ViewStore::new().shared();
        let console = Console::mount(&bus, store, &DisplayConfig::default()).unwrap();
        Seed::demo(gmt6()).publish(&bus);
        console
    }

    fn login(console: &mut Console, id: &str, pin: &str) -> Reply {
        console.handle(id);
        console.handle(pin)
    }

    fn balance(console: &Console, id: &str) -> f64 {
        console.store().read().profile(id).unwrap().balance
    }

    #[tokio::test]
    async fn test_login_lands_on_dashboard_with_welcome_toast() {
        let mut console = mounted();
        assert_eq!(console.prompt(), "ID or email> ");

        let reply = login(&mut console, "emp-001", "1111");

        assert_eq!(console.session().unwrap().id, "EMP-001");
        assert_eq!(console.tab(), Tab::Dashboard);
        assert_eq!(reply.lines[0], "[ok] Access Granted: Welcome Sarah Chen");
        assert!(reply.lines.iter().any(|l| l.contains("Your Balance: $4,200.00")));
    }

    #[tokio::test]
    async fn test_wrong_pin_keeps_pin_prompt() {
        let mut console = mounted();
        let reply = login(&mut console, "@admin", "9999");

        assert!(console.session().is_none());
        assert_eq!(console.prompt(), "PIN> ");
        assert_eq!(reply.lines, vec!["! Authentication PIN invalid".to_string()]);

        let reply = console.handle("back");
        assert_eq!(reply.lines, vec!["Enter ID or email.".to_string()]);
        assert_eq!(console.login_step(), &LoginStep::Identity);
    }

    #[tokio::test]
    async fn test_unknown_identity_is_reported() {
        let mut console = mounted();
        let reply = console.handle("nobody@createever.com");
        assert!(reply.lines[0].contains("not found"));
        assert_eq!(console.login_step(), &LoginStep::Identity);
    }

    #[tokio::test]
    async fn test_admin_deposit_updates_balance_and_history() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");

        let reply = console.handle("deposit EMP-002 400");

        assert_eq!(balance(&console, "EMP-002"), 2500.0);
        assert!(!console.confirmation().is_open());
        assert_eq!(reply.lines[0], "[ok] Transaction Finalized Successfully");
        let store = console.store().read();
        assert_eq!(store.transactions().len(), 4);
        assert_eq!(store.transactions()[0].profile_id, "EMP-002");
    }

    #[tokio::test]
    async fn test_amount_entry_retries_until_valid() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");

        console.handle("withdraw EMP-001");
        assert!(console.prompt().starts_with("withdrawal amount for Sarah Chen"));

        let reply = console.handle("abc");
        assert!(reply.lines[0].starts_with("! Invalid amount"));
        assert!(console.confirmation().is_open());

        console.handle("5000");
        assert_eq!(balance(&console, "EMP-001"), -800.0);
        assert_eq!(
            report::total_due(console.store().read().profiles()),
            1300.0
        );
    }

    #[tokio::test]
    async fn test_cancel_discards_transaction() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");
        console.handle("deposit EMP-001");
        console.handle("cancel");

        assert!(!console.confirmation().is_open());
        assert_eq!(balance(&console, "EMP-001"), 4200.0);
    }

    #[tokio::test]
    async fn test_employee_is_limited_to_own_views() {
        let mut console = mounted();
        login(&mut console, "EMP-003", "3333");

        console.handle("tab users");
        assert_eq!(console.tab(), Tab::Dashboard);
        assert_eq!(console.notice().unwrap().kind, ToastKind::Error);

        let reply = console.handle("tab activities");
        assert!(reply.lines.iter().any(|l| l.starts_with("== History ==")));
        assert!(reply.lines.iter().any(|l| l.contains("Emergency Advance")));
        assert!(!reply.lines.iter().any(|l| l.contains("Monthly Contribution")));

        console.handle("deposit EMP-003 100");
        assert_eq!(balance(&console, "EMP-003"), -500.0);

        console.handle("history EMP-001");
        assert!(console.notice().unwrap().message.contains("another member"));
    }

    #[tokio::test]
    async fn test_delete_flow_and_root_protection() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");

        console.handle(&format!("delete {ROOT_ADMIN_ID}"));
        assert!(console.notice().unwrap().message.contains("root admin"));
        assert_eq!(console.prompt(), "fund> ");

        console.handle("delete EMP-002");
        assert_eq!(console.prompt(), "delete EMP-002? (yes/no)> ");
        console.handle("maybe");
        assert_eq!(console.prompt(), "delete EMP-002? (yes/no)> ");
        console.handle("no");
        assert!(console.store().read().profile("EMP-002").is_some());

        console.handle("delete EMP-002");
        console.handle("yes");
        let store = console.store().read();
        assert!(store.profile("EMP-002").is_none());
        assert_eq!(report::total_fund_liquidity(store.profiles()), 3700.0);
    }

    #[tokio::test]
    async fn test_register_and_edit_members() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");

        console.handle(
            "register id=EMP-004; name=Dana Scully; email=dana@createever.com; pin=4444",
        );
        assert_eq!(
            console.notice().unwrap().message,
            "Registry Updated: Dana Scully"
        );

        console.handle("edit EMP-004 balance=75; name=Dana K. Scully");
        let store = console.store().read();
        let dana = store.profile("EMP-004").unwrap();
        assert_eq!(dana.full_name, "Dana K. Scully");
        assert_eq!(dana.balance, 75.0);
        assert_eq!(dana.pin, "4444");
    }

    #[tokio::test]
    async fn test_register_validation_is_inline() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");

        let reply = console.handle("register name=Nobody; pin=1");
        assert!(reply.lines.iter().any(|l| l.contains("'email' is missing")));
        assert_eq!(console.store().read().profiles().len(), 4);
    }

    #[tokio::test]
    async fn test_register_cannot_take_over_root_admin() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");

        let reply = console.handle("register id=@admin; name=Mallory; email=m@x.com; pin=0000");
        assert_eq!(reply.lines, vec!["! Profile '@admin' already exists".to_string()]);

        let session = console.session().unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.full_name, "Master Administrator");

        console.handle("register name=Dana Scully; email=dana@createever.com; pin=4444");
        assert_eq!(
            console.notice().unwrap().message,
            "Registry Updated: Dana Scully"
        );
        assert_eq!(console.store().read().profiles().len(), 5);
    }

    #[tokio::test]
    async fn test_month_selection_drives_statement() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");
        console.handle("tab data");

        let reply = console.handle("month 1 2026");
        assert!(reply.lines.iter().any(|l| l == "Statement for January 2026"));
        assert!(reply.lines.iter().any(|l| l.contains("Totals: in $800.00  out $500.00")));

        let reply = console.handle("month 2");
        assert!(reply.lines.iter().any(|l| l.contains("Totals: in $0.00  out $0.00")));
        assert_eq!(console.period().month, 2);

        let reply = console.handle("month 13");
        assert!(reply.lines[0].starts_with("! Month must be"));
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() {
        let mut console = mounted();
        login(&mut console, "@admin", "1234");
        console.handle("tab users");

        console.handle("logout");

        assert!(console.session().is_none());
        assert_eq!(console.tab(), Tab::Dashboard);
        assert_eq!(console.prompt(), "ID or email> ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_detaches_store_and_stops_timers() {
        let bus = NotificationBus::new();
        let store = ViewStore::new().shared();
        let mut console = Console::mount(&bus, store, &DisplayConfig::default()).unwrap();
        Seed::demo(gmt6()).publish(&bus);
        login(&mut console, "@admin", "1234");
        assert!(console.notice().is_some());

        console.teardown();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(console.notice().is_none());
        assert_eq!(bus.subscriber_count(crate::core::bus::Channel::Profiles), 0);
    }

    #[test]
    fn test_tab_permissions() {
        for tab in Tab::ALL {
            assert!(tab.allowed_for(Role::Admin));
        }
        assert!(Tab::Dashboard.allowed_for(Role::Employee));
        assert!(Tab::Activities.allowed_for(Role::Employee));
        assert!(!Tab::UserManagement.allowed_for(Role::Employee));
        assert_eq!(Tab::Activities.title_for(Role::Employee), "History");
        assert_eq!(Tab::parse("Employee Status"), Some(Tab::EmployeeStatus));
        assert_eq!(Tab::parse("nowhere"), None);
    }
}
