//! Cooperative event scheduler.
//!
//! Time is a single monotonically increasing half-cycle counter. The 6510
//! clock has two phases, φ1 (auxiliary chips: CIA, VIC, SID catch-up) and φ2
//! (CPU). An event scheduled for `cycles` cycles from now on phase `p` fires
//! at the smallest `t' >= 2*cycles + t` whose parity matches `p`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type EventClock = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Phi1 = 0,
    Phi2 = 1,
}

/// A scheduled unit of work. `callback` is invoked by the scheduler when the
/// event's trigger time is reached; it may reschedule itself via the
/// `EventScheduler` handle it closes over.
pub struct Event {
    pub name: &'static str,
    trigger_time: EventClock,
    pending: bool,
    next: Option<Rc<RefCell<Event>>>,
    callback: Box<dyn FnMut(EventClock)>,
}

impl Event {
    pub fn new(name: &'static str, callback: impl FnMut(EventClock) + 'static) -> Rc<RefCell<Event>> {
        Rc::new(RefCell::new(Event {
            name,
            trigger_time: 0,
            pending: false,
            next: None,
            callback: Box::new(callback),
        }))
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn trigger_time(&self) -> EventClock {
        self.trigger_time
    }
}

/// Sorted singly-linked list of pending events plus the monotonic clock.
pub struct EventScheduler {
    current_time: EventClock,
    head: Option<Rc<RefCell<Event>>>,
    self_ref: Weak<RefCell<EventScheduler>>,
}

impl EventScheduler {
    pub fn new() -> Rc<RefCell<EventScheduler>> {
        Rc::new_cyclic(|weak| {
            RefCell::new(EventScheduler {
                current_time: 0,
                head: None,
                self_ref: weak.clone(),
            })
        })
    }

    pub fn reset(&mut self) {
        let mut cur = self.head.take();
        while let Some(node) = cur {
            let mut ev = node.borrow_mut();
            ev.pending = false;
            cur = ev.next.take();
        }
        self.current_time = 0;
    }

    /// Translate `cycles` cycles from now, requested on `phase`, into an
    /// absolute half-cycle trigger time with correct parity.
    fn trigger_time_for(&self, cycles: u64, phase: Phase) -> EventClock {
        let t = self.current_time;
        let parity_adjust = (t & 1) ^ (if phase == Phase::Phi1 { 0 } else { 1 });
        (cycles << 1) + t + parity_adjust
    }

    pub fn schedule(&mut self, event: &Rc<RefCell<Event>>, cycles: u64, phase: Phase) {
        self.cancel(event);
        let tt = self.trigger_time_for(cycles, phase);
        self.insert_sorted(event, tt);
    }

    /// Same as `schedule`, but uses the phase matching the current half-cycle
    /// parity (i.e. "the next time this phase happens").
    pub fn schedule_relative(&mut self, event: &Rc<RefCell<Event>>, cycles: u64) {
        let phase = if self.current_time & 1 == 0 { Phase::Phi1 } else { Phase::Phi2 };
        self.schedule(event, cycles, phase);
    }

    fn insert_sorted(&mut self, event: &Rc<RefCell<Event>>, trigger_time: EventClock) {
        {
            let mut ev = event.borrow_mut();
            ev.trigger_time = trigger_time;
            ev.pending = true;
        }

        // Find the position: predecessor's fire time <= tt < successor's.
        let mut prev: Option<Rc<RefCell<Event>>> = None;
        let mut cur = self.head.clone();
        while let Some(node) = cur.clone() {
            if node.borrow().trigger_time > trigger_time {
                break;
            }
            prev = Some(node.clone());
            cur = node.borrow().next.clone();
        }

        event.borrow_mut().next = cur;
        match prev {
            Some(p) => p.borrow_mut().next = Some(event.clone()),
            None => self.head = Some(event.clone()),
        }
    }

    pub fn cancel(&mut self, event: &Rc<RefCell<Event>>) {
        if !event.borrow().pending {
            return;
        }
        event.borrow_mut().pending = false;

        if let Some(head) = self.head.clone() {
            if Rc::ptr_eq(&head, event) {
                self.head = head.borrow_mut().next.take();
                return;
            }
            let mut prev = head;
            loop {
                let next = prev.borrow().next.clone();
                match next {
                    Some(n) if Rc::ptr_eq(&n, event) => {
                        let after = n.borrow_mut().next.take();
                        prev.borrow_mut().next = after;
                        return;
                    }
                    Some(n) => prev = n,
                    None => return,
                }
            }
        }
    }

    /// Pop and fire the head event, advancing `current_time` to its trigger
    /// time. No-op if the queue is empty.
    pub fn clock(&mut self) {
        let Some(head) = self.head.clone() else { return };
        let tt = head.borrow().trigger_time;
        self.current_time = tt;
        self.head = head.borrow().next.clone();
        head.borrow_mut().pending = false;
        head.borrow_mut().next = None;

        // Callback may reschedule `head` via the scheduler it closes over;
        // that happens through a clone of this `Rc<RefCell<EventScheduler>>`,
        // never re-entering `clock()` itself.
        let mut ev = head.borrow_mut();
        (ev.callback)(tt);
    }

    /// Current half-cycle counter translated to whole cycles aligned to `phase`.
    pub fn now(&self, phase: Phase) -> u64 {
        self.now_at(self.current_time, phase)
    }

    pub fn now_at(&self, clock: EventClock, _phase: Phase) -> u64 {
        clock >> 1
    }

    pub fn current_time(&self) -> EventClock {
        self.current_time
    }

    pub fn handle(&self) -> Rc<RefCell<EventScheduler>> {
        self.self_ref.upgrade().expect("scheduler handle outlives scheduler")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_fires_in_order() {
        let sched = EventScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = log.clone();
        let ev_a = Event::new("a", move |_t| log_a.borrow_mut().push("a"));
        let log_b = log.clone();
        let ev_b = Event::new("b", move |_t| log_b.borrow_mut().push("b"));

        sched.borrow_mut().schedule(&ev_b, 5, Phase::Phi2);
        sched.borrow_mut().schedule(&ev_a, 1, Phase::Phi1);

        sched.borrow_mut().clock();
        sched.borrow_mut().clock();

        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn cancel_removes_pending_event() {
        let sched = EventScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        let fired2 = fired.clone();
        let ev = Event::new("x", move |_t| *fired2.borrow_mut() = true);

        sched.borrow_mut().schedule(&ev, 3, Phase::Phi1);
        sched.borrow_mut().cancel(&ev);
        assert!(!ev.borrow().is_pending());
    }

    #[test]
    fn reschedule_inside_callback_reinserts_correctly() {
        let sched = EventScheduler::new();
        let count = Rc::new(RefCell::new(0));
        let weak_handle = Rc::downgrade(&sched);

        let count2 = count.clone();
        let ev = Event::new("repeat", move |_t| {
            *count2.borrow_mut() += 1;
        });
        let ev_for_closure = ev.clone();

        // Reschedule manually between clocks to emulate self-rescheduling
        // callbacks (closures can't easily hold an Rc<RefCell<Self>> to
        // themselves without a second indirection here).
        sched.borrow_mut().schedule(&ev, 1, Phase::Phi1);
        sched.borrow_mut().clock();
        assert_eq!(*count.borrow(), 1);

        if let Some(s) = weak_handle.upgrade() {
            s.borrow_mut().schedule(&ev_for_closure, 2, Phase::Phi1);
            s.borrow_mut().clock();
        }
        assert_eq!(*count.borrow(), 2);
    }
}
