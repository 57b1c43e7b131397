use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone};

use crate::catalog::AppItemSpec;
use crate::error::{ActionError, ActionResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppItem {
    pub name: String,
    pub icon: String,
    pub blocked: bool,
    pub minutes_spent: u32,
}

impl AppItem {
    pub fn time_spent_label(&self) -> String {
        let (h, m) = (self.minutes_spent / 60, self.minutes_spent % 60);
        match (h, m) {
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockMode {
    /// Until the study plan is done; something outside this model decides when.
    StudyPlan,
    SpecificTime,
}

impl BlockMode {
    pub fn label(self) -> &'static str {
        match self {
            BlockMode::StudyPlan => "Until my study plan is finished",
            BlockMode::SpecificTime => "Until a specific time",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalBlock {
    pub mode: BlockMode,
    pub until: Option<DateTime<Local>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupervisorLock {
    pub email: String,
    pub active: bool,
}

#[derive(Clone, Debug)]
pub struct BlockList {
    items: Vec<AppItem>,
    mode: BlockMode,
    global: Option<GlobalBlock>,
    supervisor: Option<SupervisorLock>,
}

impl BlockList {
    pub fn new(specs: &[AppItemSpec]) -> Self {
        let items = specs
            .iter()
            .map(|s| AppItem {
                name: s.name.clone(),
                icon: s.icon.clone(),
                blocked: false,
                minutes_spent: s.minutes_spent,
            })
            .collect();
        Self {
            items,
            mode: BlockMode::StudyPlan,
            global: None,
            supervisor: None,
        }
    }

    pub fn items(&self) -> &[AppItem] {
        &self.items
    }

    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    pub fn global_block(&self) -> Option<&GlobalBlock> {
        self.global.as_ref()
    }

    pub fn is_globally_blocked(&self) -> bool {
        self.global.is_some()
    }

    pub fn supervisor(&self) -> Option<&SupervisorLock> {
        self.supervisor.as_ref()
    }

    pub fn is_supervised(&self) -> bool {
        self.supervisor.as_ref().is_some_and(|s| s.active)
    }

    /// Individual items are frozen while a supervised global block is on.
    pub fn is_locked(&self) -> bool {
        self.is_supervised() && self.is_globally_blocked()
    }

    pub fn toggle(&mut self, index: usize) -> ActionResult<bool> {
        if self.is_locked() {
            return Err(ActionError::Locked);
        }
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| ActionError::invalid(format!("no app at position {}", index + 1)))?;
        item.blocked = !item.blocked;
        Ok(item.blocked)
    }

    /// Choose the mode used by the next `activate_global_block`.
    pub fn set_mode(&mut self, mode: BlockMode) -> ActionResult<()> {
        if self.is_globally_blocked() {
            return Err(ActionError::invalid("the block mode cannot change while blocking"));
        }
        self.mode = mode;
        Ok(())
    }

    pub fn activate_global_block(
        &mut self,
        mode: BlockMode,
        until: Option<DateTime<Local>>,
        now: DateTime<Local>,
    ) -> ActionResult<()> {
        let until = match mode {
            BlockMode::StudyPlan => None,
            BlockMode::SpecificTime => match until {
                None => return Err(ActionError::invalid("choose when the block should end")),
                Some(t) if t <= now => {
                    return Err(ActionError::invalid("the block end time must be in the future"));
                }
                Some(t) => Some(t),
            },
        };
        for item in &mut self.items {
            item.blocked = true;
        }
        self.mode = mode;
        self.global = Some(GlobalBlock { mode, until });
        Ok(())
    }

    pub fn deactivate_global_block(&mut self, confirmation: Option<&str>) -> ActionResult<()> {
        if let Some(lock) = self.supervisor.as_ref().filter(|s| s.active) {
            if confirmation != Some(lock.email.as_str()) {
                return Err(ActionError::Unauthorized);
            }
        }
        for item in &mut self.items {
            item.blocked = false;
        }
        self.global = None;
        Ok(())
    }

    /// Register the supervisor. The lock cannot be removed or replaced for
    /// the rest of the session.
    pub fn set_supervisor(&mut self, email: &str) -> ActionResult<()> {
        if self.is_supervised() {
            return Err(ActionError::Unauthorized);
        }
        let email = email.trim();
        if !email.contains('@') {
            return Err(ActionError::invalid("enter a valid email address"));
        }
        self.supervisor = Some(SupervisorLock {
            email: email.to_string(),
            active: true,
        });
        Ok(())
    }
}

/// Parse a block end time: `YYYY-MM-DD HH:MM`, or `HH:MM` meaning today.
pub fn parse_until(text: &str, now: DateTime<Local>) -> ActionResult<DateTime<Local>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ActionError::invalid("choose when the block should end"));
    }
    let naive = if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M") {
        dt
    } else if let Ok(t) = NaiveTime::parse_from_str(text, "%H:%M") {
        now.date_naive().and_time(t)
    } else {
        return Err(ActionError::invalid(format!(
            "'{text}' is not a time (use HH:MM or YYYY-MM-DD HH:MM)"
        )));
    };
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ActionError::invalid(format!("'{text}' does not exist in local time")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn specs() -> Vec<AppItemSpec> {
        ["Facebook", "Instagram", "TikTok"]
            .iter()
            .map(|n| AppItemSpec {
                name: n.to_string(),
                icon: "*".to_string(),
                minutes_spent: 30,
            })
            .collect()
    }

    fn blocked_flags(list: &BlockList) -> Vec<bool> {
        list.items().iter().map(|i| i.blocked).collect()
    }

    #[test]
    fn toggle_flips_single_item() {
        let mut list = BlockList::new(&specs());
        assert_eq!(list.toggle(1), Ok(true));
        assert_eq!(blocked_flags(&list), vec![false, true, false]);
        assert_eq!(list.toggle(1), Ok(false));
        assert!(matches!(list.toggle(9), Err(ActionError::InvalidInput(_))));
    }

    #[test]
    fn toggle_allowed_during_unsupervised_block() {
        let mut list = BlockList::new(&specs());
        let now = Local::now();
        list.activate_global_block(BlockMode::StudyPlan, None, now).unwrap();
        assert_eq!(list.toggle(0), Ok(false));
    }

    #[test]
    fn toggle_locked_during_supervised_block() {
        let mut list = BlockList::new(&specs());
        list.set_supervisor("a@b.com").unwrap();
        // Supervisor alone does not freeze items.
        assert!(list.toggle(0).is_ok());
        list.toggle(0).unwrap();
        list.activate_global_block(BlockMode::StudyPlan, None, Local::now()).unwrap();
        let before = blocked_flags(&list);
        assert_eq!(list.toggle(0), Err(ActionError::Locked));
        assert_eq!(blocked_flags(&list), before);
    }

    #[test]
    fn deactivate_without_supervisor_always_succeeds() {
        let mut list = BlockList::new(&specs());
        assert!(list.deactivate_global_block(None).is_ok());
        list.activate_global_block(BlockMode::StudyPlan, None, Local::now()).unwrap();
        assert!(list.deactivate_global_block(Some("anything")).is_ok());
        assert!(!list.is_globally_blocked());
        assert_eq!(blocked_flags(&list), vec![false; 3]);
    }

    #[test]
    fn deactivate_requires_exact_supervisor_email() {
        let mut list = BlockList::new(&specs());
        list.set_supervisor("a@b.com").unwrap();
        list.activate_global_block(BlockMode::StudyPlan, None, Local::now()).unwrap();

        assert_eq!(
            list.deactivate_global_block(Some("wrong@x.com")),
            Err(ActionError::Unauthorized)
        );
        assert_eq!(list.deactivate_global_block(None), Err(ActionError::Unauthorized));
        assert_eq!(
            list.deactivate_global_block(Some("A@B.com")),
            Err(ActionError::Unauthorized)
        );
        assert_eq!(blocked_flags(&list), vec![true; 3]);
        assert!(list.is_globally_blocked());

        assert!(list.deactivate_global_block(Some("a@b.com")).is_ok());
        assert_eq!(blocked_flags(&list), vec![false; 3]);
    }

    #[test]
    fn specific_time_in_the_past_is_rejected() {
        let mut list = BlockList::new(&specs());
        let now = Local::now();
        let err = list
            .activate_global_block(BlockMode::SpecificTime, Some(now - Duration::hours(1)), now)
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidInput(_)));
        assert_eq!(blocked_flags(&list), vec![false; 3]);
        assert!(!list.is_globally_blocked());
    }

    #[test]
    fn specific_time_requires_a_time() {
        let mut list = BlockList::new(&specs());
        let now = Local::now();
        assert!(
            list.activate_global_block(BlockMode::SpecificTime, None, now)
                .is_err()
        );
        assert!(
            list.activate_global_block(BlockMode::SpecificTime, Some(now), now)
                .is_err()
        );
        let until = now + Duration::hours(2);
        list.activate_global_block(BlockMode::SpecificTime, Some(until), now)
            .unwrap();
        assert_eq!(list.global_block().and_then(|g| g.until), Some(until));
        assert_eq!(blocked_flags(&list), vec![true; 3]);
    }

    #[test]
    fn supervisor_email_must_look_like_one() {
        let mut list = BlockList::new(&specs());
        assert!(matches!(
            list.set_supervisor("coach.example.com"),
            Err(ActionError::InvalidInput(_))
        ));
        assert!(!list.is_supervised());
        list.set_supervisor("  coach@example.com ").unwrap();
        assert_eq!(list.supervisor().unwrap().email, "coach@example.com");
        assert_eq!(
            list.set_supervisor("other@example.com"),
            Err(ActionError::Unauthorized)
        );
    }

    #[test]
    fn mode_is_frozen_while_blocking() {
        let mut list = BlockList::new(&specs());
        list.set_mode(BlockMode::SpecificTime).unwrap();
        list.activate_global_block(BlockMode::StudyPlan, None, Local::now()).unwrap();
        assert!(list.set_mode(BlockMode::SpecificTime).is_err());
        assert_eq!(list.mode(), BlockMode::StudyPlan);
    }

    #[test]
    fn parse_until_accepts_both_formats() {
        let now = Local.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let today = parse_until("18:30", now).unwrap();
        assert_eq!(today.date_naive(), now.date_naive());
        assert_eq!(today.format("%H:%M").to_string(), "18:30");

        let full = parse_until("2025-03-02 07:15", now).unwrap();
        assert_eq!(full.format("%Y-%m-%d %H:%M").to_string(), "2025-03-02 07:15");

        assert!(parse_until("", now).is_err());
        assert!(parse_until("tomorrow", now).is_err());
    }

    #[test]
    fn time_spent_label() {
        let mut item = AppItem {
            name: "x".into(),
            icon: "x".into(),
            blocked: false,
            minutes_spent: 135,
        };
        assert_eq!(item.time_spent_label(), "2h 15m");
        item.minutes_spent = 45;
        assert_eq!(item.time_spent_label(), "45m");
        item.minutes_spent = 120;
        assert_eq!(item.time_spent_label(), "2h");
    }
}
