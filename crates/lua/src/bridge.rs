//! The scripting bridge: string-keyed field access on host entities
//!
//! Each entity type declares one static [`FieldTable`]: an explicit list
//! of `(name, getter, setter)` entries built once at compile time. The
//! handle types wrap entities in `Rc<RefCell<..>>` and route Lua's
//! `__index`/`__newindex` metamethods through the table.
//!
//! Contract:
//! - reading an undeclared field yields `nil`, never an error
//! - writing an undeclared field, or a declared field with a value of
//!   the wrong kind, raises a script error naming the type and field
//! - every dynamic value crosses the boundary as one [`FieldValue`];
//!   numeric fields convert through `f64` and apply the declared
//!   width's truncation exactly once, at the setter

use mlua::{Lua, MetaMethod, UserData, UserDataMethods, Value};
use mortar_core::{Dir, File, Package, Project};
use std::cell::RefCell;
use std::rc::Rc;

/// The one dynamic representation exchanged with script code.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Num(f64),
    Str(String),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "boolean",
            FieldValue::Int(_) | FieldValue::Num(_) => "number",
            FieldValue::Str(_) => "string",
        }
    }

    fn from_lua(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(FieldValue::Bool(*b)),
            Value::Integer(i) => Some(FieldValue::Int(*i)),
            Value::Number(n) => Some(FieldValue::Num(*n)),
            Value::String(s) => match s.to_str() {
                Ok(s) => Some(FieldValue::Str(s.to_string())),
                Err(_) => None,
            },
            _ => None,
        }
    }

    fn into_lua(self, lua: &Lua) -> mlua::Result<Value> {
        match self {
            FieldValue::Bool(b) => Ok(Value::Boolean(b)),
            FieldValue::Int(i) => Ok(Value::Integer(i)),
            FieldValue::Num(n) => Ok(Value::Number(n)),
            FieldValue::Str(s) => Ok(Value::String(lua.create_string(&s)?)),
        }
    }

    /// Script-visible numeric representation of this value, if numeric.
    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

type Getter<T> = fn(&T) -> FieldValue;
/// Setters return the expected kind name on a mismatch.
type Setter<T> = fn(&mut T, &FieldValue) -> Result<(), &'static str>;

/// Accessor table for one entity type, built once as a static.
pub struct FieldTable<T: 'static> {
    type_name: &'static str,
    fields: &'static [(&'static str, Getter<T>, Setter<T>)],
}

impl<T> FieldTable<T> {
    fn read(&self, target: &T, lua: &Lua, key: &str) -> mlua::Result<Value> {
        match self.fields.iter().find(|(name, ..)| *name == key) {
            Some((_, get, _)) => get(target).into_lua(lua),
            None => Ok(Value::Nil),
        }
    }

    fn write(&self, target: &mut T, key: &str, value: &Value) -> mlua::Result<()> {
        let Some((_, _, set)) = self.fields.iter().find(|(name, ..)| *name == key) else {
            return Err(mlua::Error::runtime(format!(
                "{} has no field '{}'",
                self.type_name, key
            )));
        };
        let Some(field_value) = FieldValue::from_lua(value) else {
            return Err(mlua::Error::runtime(format!(
                "cannot assign a {} to {}.{}",
                value.type_name(),
                self.type_name,
                key
            )));
        };
        set(target, &field_value).map_err(|expected| {
            mlua::Error::runtime(format!(
                "{}.{} expects a {}, got {}",
                self.type_name,
                key,
                expected,
                field_value.kind()
            ))
        })
    }
}

fn set_string(field: &mut String, value: &FieldValue) -> Result<(), &'static str> {
    value
        .as_str()
        .map(|s| *field = s.to_string())
        .ok_or("string")
}

fn set_bool(field: &mut bool, value: &FieldValue) -> Result<(), &'static str> {
    value.as_bool().map(|b| *field = b).ok_or("boolean")
}

static FILE_FIELDS: FieldTable<File> = FieldTable {
    type_name: "File",
    fields: &[
        ("name", |f| FieldValue::Str(f.name.clone()), |f, v| set_string(&mut f.name, v)),
        ("ext", |f| FieldValue::Str(f.ext.clone()), |f, v| set_string(&mut f.ext, v)),
        ("path", |f| FieldValue::Str(f.path.clone()), |f, v| set_string(&mut f.path, v)),
        ("found", |f| FieldValue::Bool(f.found), |f, v| set_bool(&mut f.found, v)),
    ],
};

static DIR_FIELDS: FieldTable<Dir> = FieldTable {
    type_name: "Dir",
    fields: &[
        ("name", |d| FieldValue::Str(d.name.clone()), |d, v| set_string(&mut d.name, v)),
        ("path", |d| FieldValue::Str(d.path.clone()), |d, v| set_string(&mut d.path, v)),
        ("found", |d| FieldValue::Bool(d.found), |d, v| set_bool(&mut d.found, v)),
    ],
};

static PACKAGE_FIELDS: FieldTable<Package> = FieldTable {
    type_name: "Package",
    fields: &[
        ("name", |p| FieldValue::Str(p.name.clone()), |p, v| set_string(&mut p.name, v)),
        ("cflags", |p| FieldValue::Str(p.cflags.clone()), |p, v| set_string(&mut p.cflags, v)),
        ("libs", |p| FieldValue::Str(p.libs.clone()), |p, v| set_string(&mut p.libs, v)),
        ("found", |p| FieldValue::Bool(p.found), |p, v| set_bool(&mut p.found, v)),
    ],
};

// List-valued project state (sources, flag lists, ..) is deliberately
// not bridge-visible; it is only manipulated through the API functions,
// which enforce found-filtering and append order.
static PROJECT_FIELDS: FieldTable<Project> = FieldTable {
    type_name: "Project",
    fields: &[
        ("name", |p| FieldValue::Str(p.name.clone()), |p, v| set_string(&mut p.name, v)),
        ("os", |p| FieldValue::Str(p.os.clone()), |p, v| set_string(&mut p.os, v)),
        ("cwd", |p| FieldValue::Str(p.cwd.clone()), |p, v| set_string(&mut p.cwd, v)),
        ("build_dir", |p| FieldValue::Str(p.build_dir.clone()), |p, v| {
            set_string(&mut p.build_dir, v)
        }),
        ("script_path", |p| FieldValue::Str(p.script_path.clone()), |p, v| {
            set_string(&mut p.script_path, v)
        }),
        ("script_dir", |p| FieldValue::Str(p.script_dir.clone()), |p, v| {
            set_string(&mut p.script_dir, v)
        }),
        ("compiler", |p| FieldValue::Str(p.compiler.clone()), |p, v| {
            set_string(&mut p.compiler, v)
        }),
        ("assembler", |p| FieldValue::Str(p.assembler.clone()), |p, v| {
            set_string(&mut p.assembler, v)
        }),
        ("autoconfigure", |p| FieldValue::Bool(p.autoconfigure), |p, v| {
            set_bool(&mut p.autoconfigure, v)
        }),
    ],
};

macro_rules! bridge_handle {
    ($(#[$doc:meta])* $handle:ident, $entity:ty, $table:ident) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $handle(pub Rc<RefCell<$entity>>);

        impl $handle {
            pub fn new(inner: $entity) -> Self {
                Self(Rc::new(RefCell::new(inner)))
            }
        }

        impl UserData for $handle {
            fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
                methods.add_meta_method(MetaMethod::Index, |lua, this, key: String| {
                    $table.read(&this.0.borrow(), lua, &key)
                });
                methods.add_meta_method(
                    MetaMethod::NewIndex,
                    |_, this, (key, value): (String, Value)| {
                        $table.write(&mut this.0.borrow_mut(), &key, &value)
                    },
                );
            }
        }
    };
}

bridge_handle!(
    /// Script handle for a discovered [`File`].
    FileHandle,
    File,
    FILE_FIELDS
);
bridge_handle!(
    /// Script handle for a discovered [`Dir`].
    DirHandle,
    Dir,
    DIR_FIELDS
);
bridge_handle!(
    /// Script handle for a resolved [`Package`].
    PackageHandle,
    Package,
    PACKAGE_FIELDS
);
bridge_handle!(
    /// Script handle for a [`Project`]; shared with the runtime's registry.
    ProjectHandle,
    Project,
    PROJECT_FIELDS
);
