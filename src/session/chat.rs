use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rand::Rng;
use rand::rngs::SmallRng;

use crate::catalog::{Catalog, Exercise};
use crate::engine::quiz::{self, Evaluation};
use crate::engine::responder::{self, BotReply, Responder};
use crate::engine::schedule::ScheduleQueue;
use crate::error::{ActionError, ActionResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
    pub exercise: Option<Exercise>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatStep {
    ChooseSubject,
    ChooseUnit { subject: String },
    Conversation { subject: String, unit: Option<u32> },
}

#[derive(Debug)]
enum Pending {
    /// Answer to a user message; resolved against the exercise index at
    /// delivery time.
    Reply(String),
    NextExercise(usize),
}

pub struct ChatSession<'a, R: Rng = SmallRng> {
    catalog: &'a Catalog,
    responder: Responder<'a, R>,
    step: ChatStep,
    messages: Vec<ChatMessage>,
    exercise_index: usize,
    awaiting_answer: bool,
    pending: ScheduleQueue<Pending>,
    reply_delay: Duration,
    next_exercise_delay: Duration,
    next_id: u64,
    /// Highlighted row on the subject and unit pickers.
    pub list_cursor: usize,
}

impl<'a, R: Rng> ChatSession<'a, R> {
    pub fn new(
        catalog: &'a Catalog,
        rng: R,
        reply_delay: Duration,
        next_exercise_delay: Duration,
    ) -> Self {
        Self {
            catalog,
            responder: Responder::new(&catalog.tutor, rng),
            step: ChatStep::ChooseSubject,
            messages: Vec::new(),
            exercise_index: 0,
            awaiting_answer: false,
            pending: ScheduleQueue::new(),
            reply_delay,
            next_exercise_delay,
            next_id: 1,
            list_cursor: 0,
        }
    }

    pub fn step(&self) -> &ChatStep {
        &self.step
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    /// A bot reply is on its way.
    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    /// Exercise carried by the most recent bot message that has one.
    pub fn active_exercise(&self) -> Option<&Exercise> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Bot && m.exercise.is_some())
            .and_then(|m| m.exercise.as_ref())
    }

    pub fn choose_subject(&mut self, subject_id: &str) -> ActionResult<()> {
        let subject = self
            .catalog
            .subject(subject_id)
            .ok_or_else(|| ActionError::invalid(format!("unknown subject '{subject_id}'")))?;
        self.list_cursor = 0;
        if subject.id == self.catalog.tutor.unit_subject {
            self.step = ChatStep::ChooseUnit {
                subject: subject.id.clone(),
            };
        } else {
            self.start_conversation(subject.id.clone(), None);
        }
        Ok(())
    }

    pub fn choose_unit(&mut self, unit_id: u32) -> ActionResult<()> {
        let ChatStep::ChooseUnit { subject } = &self.step else {
            return Err(ActionError::invalid("pick a subject first"));
        };
        if self.catalog.tutor_unit(unit_id).is_none() {
            return Err(ActionError::invalid(format!("unknown unit {unit_id}")));
        }
        let subject = subject.clone();
        self.start_conversation(subject, Some(unit_id));
        Ok(())
    }

    fn start_conversation(&mut self, subject_id: String, unit: Option<u32>) {
        self.cancel_pending();
        self.messages.clear();
        self.awaiting_answer = false;

        let subject_name = self
            .catalog
            .subject(&subject_id)
            .map(|s| s.name_en.as_str())
            .unwrap_or("your subject");
        let text = match unit.and_then(|u| self.catalog.tutor_unit(u)) {
            Some(u) => format!(
                "Hello! I'm your tutor for {subject_name} - {}. I can help you understand \
                 the lessons and solve exercises. What topic would you like to talk about?",
                u.name
            ),
            None => format!("Hello! I'm your tutor for {subject_name}. How can I help you today?"),
        };
        self.push(Sender::Bot, text, None);
        self.step = ChatStep::Conversation {
            subject: subject_id,
            unit,
        };
        tracing::debug!(step = ?self.step, "chat conversation started");
    }

    /// One step back inside the tutor. Returns false when already at the
    /// subject picker, meaning the caller should leave the page.
    pub fn back(&mut self) -> bool {
        self.cancel_pending();
        self.list_cursor = 0;
        self.step = match &self.step {
            ChatStep::ChooseSubject => return false,
            ChatStep::ChooseUnit { .. } => ChatStep::ChooseSubject,
            ChatStep::Conversation {
                subject,
                unit: Some(_),
            } => ChatStep::ChooseUnit {
                subject: subject.clone(),
            },
            ChatStep::Conversation { unit: None, .. } => ChatStep::ChooseSubject,
        };
        true
    }

    /// Post a user message and schedule the tutor's reply. Blank input is
    /// ignored, as is anything sent while the tutor is still typing.
    pub fn send(&mut self, text: &str, now: Instant) -> bool {
        let text = text.trim();
        if text.is_empty()
            || self.is_typing()
            || !matches!(self.step, ChatStep::Conversation { .. })
        {
            return false;
        }
        self.push(Sender::User, text.to_string(), None);
        self.pending
            .schedule(now, self.reply_delay, Pending::Reply(text.to_string()));
        true
    }

    /// Check an answer against the active exercise. A bare option number
    /// selects that option of a multiple-choice exercise.
    pub fn answer_exercise(&mut self, answer: &str, now: Instant) -> ActionResult<Evaluation> {
        let exercise = self
            .active_exercise()
            .filter(|_| self.awaiting_answer)
            .cloned()
            .ok_or_else(|| ActionError::invalid("there is no exercise to answer"))?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ActionError::invalid("type an answer first"));
        }
        let answer = match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= exercise.options.len() => exercise.options[n - 1].as_str(),
            _ => answer,
        };

        let evaluation = quiz::check_exercise_answer(answer, &exercise);
        self.push(Sender::User, answer.to_string(), None);
        self.push(Sender::Bot, evaluation.feedback.clone(), None);

        if evaluation.correct {
            self.awaiting_answer = false;
            if self.exercise_index + 1 < self.responder.exercise_count() {
                self.exercise_index += 1;
                self.pending.schedule(
                    now,
                    self.next_exercise_delay,
                    Pending::NextExercise(self.exercise_index),
                );
            }
        }
        Ok(evaluation)
    }

    /// Stop waiting for an answer without submitting one.
    pub fn skip_exercise(&mut self) {
        self.awaiting_answer = false;
    }

    /// Deliver replies that are due. Returns how many arrived.
    pub fn poll(&mut self, now: Instant) -> usize {
        let ready = self.pending.poll(now);
        let count = ready.len();
        for item in ready {
            let reply = match item {
                Pending::Reply(text) => self.responder.respond(&text, self.exercise_index),
                Pending::NextExercise(index) => match self.responder.exercise_at(index) {
                    Some(ex) => responder::exercise_reply("Great! On to the next exercise.", ex),
                    None => continue,
                },
            };
            self.push_reply(reply);
        }
        count
    }

    /// Drop replies that have not been delivered yet.
    pub fn cancel_pending(&mut self) {
        let n = self.pending.cancel_all();
        if n > 0 {
            tracing::debug!(cancelled = n, "dropped pending chat replies");
        }
    }

    fn push_reply(&mut self, reply: BotReply) {
        if reply.exercise.is_some() {
            self.awaiting_answer = true;
        }
        self.push(Sender::Bot, reply.text, reply.exercise);
    }

    fn push(&mut self, sender: Sender, text: String, exercise: Option<Exercise>) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            text,
            sender,
            timestamp: Local::now(),
            exercise,
        });
        self.next_id += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const REPLY: Duration = Duration::from_millis(1500);
    const NEXT: Duration = Duration::from_millis(2000);

    fn catalog() -> &'static Catalog {
        Box::leak(Box::new(Catalog::embedded().unwrap()))
    }

    fn english_chat(catalog: &Catalog) -> ChatSession<'_> {
        let mut chat = ChatSession::new(catalog, SmallRng::seed_from_u64(5), REPLY, NEXT);
        chat.choose_subject("english").unwrap();
        chat.choose_unit(1).unwrap();
        chat
    }

    #[test]
    fn english_goes_through_unit_step() {
        let cat = catalog();
        let mut chat = ChatSession::new(cat, SmallRng::seed_from_u64(5), REPLY, NEXT);
        chat.choose_subject("english").unwrap();
        assert!(matches!(chat.step(), ChatStep::ChooseUnit { .. }));
        chat.choose_unit(1).unwrap();
        assert_eq!(
            chat.step(),
            &ChatStep::Conversation {
                subject: "english".into(),
                unit: Some(1)
            }
        );
        assert_eq!(chat.messages().len(), 1);
        assert!(chat.messages()[0].text.contains("Unit 1"));
    }

    #[test]
    fn other_subjects_go_straight_to_chat() {
        let cat = catalog();
        let mut chat = ChatSession::new(cat, SmallRng::seed_from_u64(5), REPLY, NEXT);
        chat.choose_subject("math").unwrap();
        assert!(matches!(
            chat.step(),
            ChatStep::Conversation { unit: None, .. }
        ));
        assert!(chat.choose_unit(1).is_err());
    }

    #[test]
    fn reply_arrives_after_delay() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let t0 = Instant::now();
        assert!(chat.send("hello there", t0));
        assert!(chat.is_typing());
        assert_eq!(chat.poll(t0 + Duration::from_millis(100)), 0);
        assert_eq!(chat.poll(t0 + REPLY), 1);
        assert!(!chat.is_typing());
        let last = chat.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert!(cat.tutor.canned_responses.contains(&last.text));
    }

    #[test]
    fn blank_messages_are_ignored() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        assert!(!chat.send("   ", Instant::now()));
        assert_eq!(chat.messages().len(), 1);
        assert!(!chat.is_typing());
    }

    #[test]
    fn trigger_phrase_yields_exercise_and_correct_answer_advances() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let t0 = Instant::now();
        chat.send("teach me the present simple", t0);
        chat.poll(t0 + REPLY);
        assert!(chat.awaiting_answer());
        assert_eq!(chat.active_exercise(), Some(&cat.tutor.exercises[0]));

        let wrong = chat.answer_exercise("tennis", t0 + REPLY).unwrap();
        assert!(!wrong.correct);
        assert_eq!(chat.exercise_index(), 0);
        assert!(chat.awaiting_answer());

        let right = chat.answer_exercise("PLAYS", t0 + REPLY).unwrap();
        assert!(right.correct);
        assert_eq!(chat.exercise_index(), 1);
        assert!(!chat.awaiting_answer());

        chat.poll(t0 + REPLY + NEXT);
        assert_eq!(chat.active_exercise(), Some(&cat.tutor.exercises[1]));
    }

    #[test]
    fn option_number_selects_the_option() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let t0 = Instant::now();
        chat.send("present simple", t0);
        chat.poll(t0 + REPLY);
        chat.answer_exercise("plays", t0).unwrap();
        chat.poll(t0 + NEXT);
        // Second exercise: option 1 is "Present Simple".
        let eval = chat.answer_exercise("1", t0 + NEXT).unwrap();
        assert!(eval.correct);
        assert_eq!(chat.exercise_index(), 2);
    }

    #[test]
    fn index_stays_on_last_exercise() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let last = cat.tutor.exercises.len() - 1;
        let mut now = Instant::now();
        chat.send("present simple", now);
        for ex in &cat.tutor.exercises {
            now += NEXT;
            chat.poll(now);
            chat.answer_exercise(&ex.correct_answer, now).unwrap();
        }
        assert_eq!(chat.exercise_index(), last);
        assert!(!chat.is_typing());
    }

    #[test]
    fn answering_without_exercise_is_invalid() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        assert!(matches!(
            chat.answer_exercise("plays", Instant::now()),
            Err(ActionError::InvalidInput(_))
        ));
    }

    #[test]
    fn solved_exercise_cannot_be_answered_again() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let t0 = Instant::now();
        chat.send("present simple", t0);
        chat.poll(t0 + REPLY);
        chat.answer_exercise("plays", t0 + REPLY).unwrap();
        assert_eq!(chat.exercise_index(), 1);

        assert!(matches!(
            chat.answer_exercise("plays", t0 + REPLY),
            Err(ActionError::InvalidInput(_))
        ));
        assert_eq!(chat.exercise_index(), 1);

        assert_eq!(chat.poll(t0 + REPLY + NEXT), 1);
        assert_eq!(chat.active_exercise(), Some(&cat.tutor.exercises[1]));
        assert!(!chat.is_typing());
    }

    #[test]
    fn skipped_exercise_is_not_answerable() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let t0 = Instant::now();
        chat.send("present simple", t0);
        chat.poll(t0 + REPLY);
        chat.skip_exercise();
        assert!(chat.answer_exercise("plays", t0 + REPLY).is_err());
        assert_eq!(chat.exercise_index(), 0);
    }

    #[test]
    fn sending_while_tutor_types_is_ignored() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let t0 = Instant::now();
        assert!(chat.send("hello", t0));
        let before = chat.messages().len();
        assert!(!chat.send("are you there?", t0 + Duration::from_millis(200)));
        assert_eq!(chat.messages().len(), before);
        assert_eq!(chat.poll(t0 + REPLY + REPLY), 1);
        assert!(chat.send("are you there?", t0 + REPLY + REPLY));
    }

    #[test]
    fn leaving_the_conversation_cancels_pending_reply() {
        let cat = catalog();
        let mut chat = english_chat(cat);
        let t0 = Instant::now();
        chat.send("hello", t0);
        assert!(chat.back());
        assert!(matches!(chat.step(), ChatStep::ChooseUnit { .. }));
        let before = chat.messages().len();
        assert_eq!(chat.poll(t0 + Duration::from_secs(10)), 0);
        assert_eq!(chat.messages().len(), before);
        assert!(chat.back());
        assert!(!chat.back());
    }
}
