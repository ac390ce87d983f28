use crate::object::Object;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// One scope frame. Lookups walk outward through `outer`, writes always land here.
#[derive(Debug, Default)]
pub struct Env {
    vars: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Env>>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_rc() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// A fresh frame enclosed by `outer`.
    pub fn child(outer: Rc<RefCell<Env>>) -> Self {
        Self {
            vars: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.vars.get(name) {
            Some(val) => Some(val.clone()),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    pub fn set(&mut self, name: &str, val: Object) -> Option<Object> {
        self.vars.insert(name.to_owned(), val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let global = Env::new_rc();
        global.borrow_mut().set("x", 1.into());
        let inner = Env::child(global.clone());
        assert_eq!(inner.get("x"), Some(Object::Integer(1)));
        assert_eq!(inner.get("y"), None);
    }

    #[test]
    fn set_shadows_without_touching_outer() {
        let global = Env::new_rc();
        global.borrow_mut().set("x", 1.into());
        let mut inner = Env::child(global.clone());
        inner.set("x", 2.into());
        assert_eq!(inner.get("x"), Some(Object::Integer(2)));
        assert_eq!(global.borrow().get("x"), Some(Object::Integer(1)));
    }

    #[test]
    fn last_write_wins() {
        let mut env = Env::new();
        assert_eq!(env.set("a", true.into()), None);
        assert_eq!(env.set("a", false.into()), Some(Object::Boolean(true)));
        assert_eq!(env.get("a"), Some(Object::Boolean(false)));
    }

    #[test]
    fn later_outer_bindings_are_visible() {
        let global = Env::new_rc();
        let inner = Env::child(global.clone());
        global.borrow_mut().set("late", 3.into());
        assert_eq!(inner.get("late"), Some(Object::Integer(3)));
    }
}
