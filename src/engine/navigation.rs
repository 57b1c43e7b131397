use crate::catalog::{Catalog, VocabularyCategory};

/// Top-level destinations offered by the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Leaderboard,
    Subjects,
    Chatbot,
    Distractions,
}

impl MenuEntry {
    pub fn all() -> &'static [MenuEntry] {
        &[
            MenuEntry::Leaderboard,
            MenuEntry::Subjects,
            MenuEntry::Chatbot,
            MenuEntry::Distractions,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::Leaderboard => "Leaderboards & Competitions",
            MenuEntry::Subjects => "Master Your Lessons",
            MenuEntry::Chatbot => "Understand Your Lessons",
            MenuEntry::Distractions => "Block Distractions",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuEntry::Leaderboard => "Compete with classmates and earn points",
            MenuEntry::Subjects => "Start learning with your school subjects",
            MenuEntry::Chatbot => "A tutor to review and understand the material",
            MenuEntry::Distractions => "Control your apps while you study",
        }
    }
}

/// The active screen. Each variant carries exactly the selection it needs,
/// so a unit can never be selected without its subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    MainMenu,
    Subjects,
    Units {
        subject: String,
    },
    VocabularySelection {
        subject: String,
        unit: u32,
    },
    Vocabulary {
        subject: String,
        unit: u32,
        category: VocabularyCategory,
    },
    Leaderboard,
    Chatbot,
    Distractions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Login,
    SelectMenu(MenuEntry),
    SelectSubject(String),
    SelectUnit(u32),
    SelectVocabulary(VocabularyCategory),
    BackToSubjects,
    BackToUnits,
    BackToVocabSelection,
    BackToMenu,
}

/// Flattened view of the selection carried by a page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub subject: Option<String>,
    pub unit: Option<u32>,
    pub category: Option<VocabularyCategory>,
}

impl Selection {
    /// Dependents are only set when their parent is.
    pub fn is_consistent(&self) -> bool {
        (self.unit.is_none() || self.subject.is_some())
            && (self.category.is_none() || self.unit.is_some())
    }
}

impl Page {
    pub fn selection(&self) -> Selection {
        match self {
            Page::Units { subject } => Selection {
                subject: Some(subject.clone()),
                ..Selection::default()
            },
            Page::VocabularySelection { subject, unit } => Selection {
                subject: Some(subject.clone()),
                unit: Some(*unit),
                category: None,
            },
            Page::Vocabulary {
                subject,
                unit,
                category,
            } => Selection {
                subject: Some(subject.clone()),
                unit: Some(*unit),
                category: Some(*category),
            },
            _ => Selection::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Login => "Login",
            Page::MainMenu => "Main Menu",
            Page::Subjects => "Subjects",
            Page::Units { .. } => "Units",
            Page::VocabularySelection { .. } => "Vocabulary",
            Page::Vocabulary { .. } => "Vocabulary Quiz",
            Page::Leaderboard => "Leaderboard",
            Page::Chatbot => "Tutor",
            Page::Distractions => "Distractions",
        }
    }
}

/// Apply `action` to `page`. Actions that do not apply to the current page
/// return it unchanged.
pub fn transition(page: &Page, action: Action, catalog: &Catalog) -> Page {
    match (page, action) {
        (Page::Login, Action::Login) => Page::MainMenu,

        (Page::MainMenu, Action::SelectMenu(entry)) => match entry {
            MenuEntry::Leaderboard => Page::Leaderboard,
            MenuEntry::Subjects => Page::Subjects,
            MenuEntry::Chatbot => Page::Chatbot,
            MenuEntry::Distractions => Page::Distractions,
        },

        (Page::Subjects, Action::SelectSubject(id)) if catalog.subject(&id).is_some() => {
            Page::Units { subject: id }
        }

        (Page::Units { subject }, Action::SelectUnit(unit))
            if catalog.unit(unit).is_some() && catalog.unit_is_open(subject, unit) =>
        {
            Page::VocabularySelection {
                subject: subject.clone(),
                unit,
            }
        }

        (Page::VocabularySelection { subject, unit }, Action::SelectVocabulary(category)) => {
            Page::Vocabulary {
                subject: subject.clone(),
                unit: *unit,
                category,
            }
        }

        (
            Page::Units { .. } | Page::VocabularySelection { .. } | Page::Vocabulary { .. },
            Action::BackToSubjects,
        ) => Page::Subjects,

        (
            Page::VocabularySelection { subject, .. } | Page::Vocabulary { subject, .. },
            Action::BackToUnits,
        ) => Page::Units {
            subject: subject.clone(),
        },

        (Page::Vocabulary { subject, unit, .. }, Action::BackToVocabSelection) => {
            Page::VocabularySelection {
                subject: subject.clone(),
                unit: *unit,
            }
        }

        (Page::Login, Action::BackToMenu) => Page::Login,
        (_, Action::BackToMenu) => Page::MainMenu,

        (current, _) => current.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    fn all_actions() -> Vec<Action> {
        let mut actions = vec![
            Action::Login,
            Action::SelectSubject("english".to_string()),
            Action::SelectSubject("math".to_string()),
            Action::SelectSubject("nope".to_string()),
            Action::SelectUnit(1),
            Action::SelectUnit(2),
            Action::SelectUnit(99),
            Action::SelectVocabulary(VocabularyCategory::Main),
            Action::SelectVocabulary(VocabularyCategory::Additional),
            Action::BackToSubjects,
            Action::BackToUnits,
            Action::BackToVocabSelection,
            Action::BackToMenu,
        ];
        actions.extend(MenuEntry::all().iter().map(|&e| Action::SelectMenu(e)));
        actions
    }

    fn vocabulary_page(cat: &Catalog) -> Page {
        let mut page = Page::Login;
        for action in [
            Action::Login,
            Action::SelectMenu(MenuEntry::Subjects),
            Action::SelectSubject("english".to_string()),
            Action::SelectUnit(1),
            Action::SelectVocabulary(VocabularyCategory::Main),
        ] {
            page = transition(&page, action, cat);
        }
        page
    }

    #[test]
    fn happy_path_reaches_vocabulary() {
        let cat = catalog();
        let page = vocabulary_page(&cat);
        assert_eq!(
            page,
            Page::Vocabulary {
                subject: "english".to_string(),
                unit: 1,
                category: VocabularyCategory::Main,
            }
        );
    }

    #[test]
    fn back_to_subjects_clears_every_dependent() {
        let cat = catalog();
        let page = transition(&vocabulary_page(&cat), Action::BackToSubjects, &cat);
        assert_eq!(page, Page::Subjects);
        assert_eq!(page.selection(), Selection::default());
    }

    #[test]
    fn back_to_units_keeps_subject_only() {
        let cat = catalog();
        let page = transition(&vocabulary_page(&cat), Action::BackToUnits, &cat);
        let sel = page.selection();
        assert_eq!(sel.subject.as_deref(), Some("english"));
        assert_eq!(sel.unit, None);
        assert_eq!(sel.category, None);
    }

    #[test]
    fn back_to_vocab_selection_clears_category() {
        let cat = catalog();
        let page = transition(&vocabulary_page(&cat), Action::BackToVocabSelection, &cat);
        let sel = page.selection();
        assert_eq!(sel.unit, Some(1));
        assert_eq!(sel.category, None);
    }

    #[test]
    fn invalid_actions_are_noops() {
        let cat = catalog();
        assert_eq!(transition(&Page::Login, Action::BackToSubjects, &cat), Page::Login);
        assert_eq!(transition(&Page::Login, Action::BackToMenu, &cat), Page::Login);
        assert_eq!(
            transition(&Page::Subjects, Action::SelectSubject("nope".into()), &cat),
            Page::Subjects
        );
        let units = Page::Units {
            subject: "math".to_string(),
        };
        // Only units with vocabulary content open.
        assert_eq!(transition(&units, Action::SelectUnit(1), &cat), units);
        assert_eq!(
            transition(&Page::MainMenu, Action::SelectVocabulary(VocabularyCategory::Main), &cat),
            Page::MainMenu
        );
    }

    #[test]
    fn selection_never_holds_orphaned_dependents() {
        // Exhaustive over all three-step action sequences from every reachable page.
        let cat = catalog();
        let actions = all_actions();
        let mut frontier = vec![Page::Login];
        let mut seen: Vec<Page> = Vec::new();
        for _ in 0..6 {
            let mut next = Vec::new();
            for page in &frontier {
                for action in &actions {
                    let p = transition(page, action.clone(), &cat);
                    assert!(p.selection().is_consistent(), "{p:?} after {action:?}");
                    if !seen.contains(&p) {
                        seen.push(p.clone());
                        next.push(p);
                    }
                }
            }
            frontier = next;
        }
        assert!(seen.iter().any(|p| matches!(p, Page::Vocabulary { .. })));
    }

    #[test]
    fn back_sequences_keep_selection_consistent() {
        let cat = catalog();
        let backs = [
            Action::BackToSubjects,
            Action::BackToUnits,
            Action::BackToVocabSelection,
            Action::BackToMenu,
        ];
        for a in &backs {
            for b in &backs {
                for c in &backs {
                    let mut page = vocabulary_page(&cat);
                    for action in [a, b, c] {
                        page = transition(&page, action.clone(), &cat);
                        assert!(page.selection().is_consistent());
                    }
                }
            }
        }
    }

    #[test]
    fn back_to_menu_from_anywhere_after_login() {
        let cat = catalog();
        for page in [
            Page::Subjects,
            Page::Leaderboard,
            Page::Chatbot,
            Page::Distractions,
            vocabulary_page(&cat),
        ] {
            assert_eq!(transition(&page, Action::BackToMenu, &cat), Page::MainMenu);
        }
    }
}
