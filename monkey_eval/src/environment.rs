use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::debug;

use crate::types::Value;

#[derive(Debug, Default)]
pub struct Env {
    values: HashMap<String, Value>,
    parent: Option<Rc<RefCell<Env>>>,
}

impl Env {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn with_parent(parent: Rc<RefCell<Env>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            parent: Some(parent),
            ..Default::default()
        }))
    }

    /// Binds `name` in this scope. An outer binding of the
    /// same name is shadowed, never overwritten.
    pub fn set(&mut self, name: &str, value: Value) {
        debug!("Set {name} -> {value}");
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        debug!("Get {name}");
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            debug!("Get {name} from parent");
            return parent.borrow().get(name);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let env = Env::new();
        assert_eq!(env.borrow().get("foo"), None);
        env.borrow_mut().set("foo", Value::Integer(42));
        assert_eq!(env.borrow().get("foo"), Some(Value::Integer(42)));
        env.borrow_mut().set("foo", Value::NULL);
        assert_eq!(env.borrow().get("foo"), Some(Value::NULL));
    }

    #[test]
    fn get_from_parent() {
        let outer = Env::new();
        outer.borrow_mut().set("foo", Value::TRUE);
        let inner = Env::with_parent(Rc::clone(&outer));
        let innermost = Env::with_parent(inner);
        assert_eq!(innermost.borrow().get("foo"), Some(Value::TRUE));
        assert_eq!(innermost.borrow().get("bar"), None);
    }

    #[test]
    fn shadow_parent() {
        let outer = Env::new();
        outer.borrow_mut().set("foo", Value::TRUE);
        let inner = Env::with_parent(Rc::clone(&outer));
        inner.borrow_mut().set("foo", Value::Integer(1));
        assert_eq!(inner.borrow().get("foo"), Some(Value::Integer(1)));
        assert_eq!(outer.borrow().get("foo"), Some(Value::TRUE));
    }
}
