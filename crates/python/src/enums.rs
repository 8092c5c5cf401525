//! Enum bindings for Python.
//!
//! Each core enum becomes an integer-comparable Python class. Members are
//! also exported at module level, named as in the registry.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::{PyClass, PyClassInitializer};
use quire_core::registry::EnumTable;
use quire_core::{PageBox, Permission, Permissions, Rotation};

use crate::ustring::to_py_err;

/// A Python enum class mirroring a core enum.
pub trait ExportedEnum: PyClass + Into<PyClassInitializer<Self>> + Sized {
    fn from_value(value: i64) -> Option<Self>;
}

macro_rules! py_enum {
    ($py:ident, $core:ident, $pyname:literal {
        $($variant:ident = $value:literal => $label:literal,)+
    } $(methods { $($extra:tt)* })?) => {
        #[pyclass(name = $pyname, module = "quire", eq, eq_int, hash, frozen)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $py {
            $(
                #[pyo3(name = $label)]
                $variant = $value,
            )+
        }

        impl From<$core> for $py {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => $py::$variant,)+
                }
            }
        }

        impl From<$py> for $core {
            fn from(value: $py) -> Self {
                match value {
                    $($py::$variant => $core::$variant,)+
                }
            }
        }

        impl ExportedEnum for $py {
            fn from_value(value: i64) -> Option<Self> {
                $core::from_value(value).map($py::from)
            }
        }

        #[pymethods]
        impl $py {
            #[getter]
            fn name(&self) -> &'static str {
                $core::from(*self).name()
            }

            #[getter]
            fn value(&self) -> i64 {
                $core::from(*self).value()
            }

            #[staticmethod]
            #[pyo3(name = "from_value")]
            fn py_from_value(value: i64) -> PyResult<Self> {
                <Self as ExportedEnum>::from_value(value).ok_or_else(|| {
                    PyValueError::new_err(format!("{value} is not a valid {}", $pyname))
                })
            }

            $($($extra)*)?
        }
    };
}

py_enum!(PyPermission, Permission, "permission_enum" {
    Print = 0 => "print",
    Change = 1 => "change",
    Copy = 2 => "copy",
    AddNotes = 3 => "add_notes",
    FillForms = 4 => "fill_forms",
    Accessibility = 5 => "accessibility",
    Assemble = 6 => "assemble",
    PrintHighResolution = 7 => "print_high_resolution",
});

py_enum!(PyPageBox, PageBox, "page_box_enum" {
    MediaBox = 0 => "media_box",
    CropBox = 1 => "crop_box",
    BleedBox = 2 => "bleed_box",
    TrimBox = 3 => "trim_box",
    ArtBox = 4 => "art_box",
} methods {
    /// Page dictionary key, e.g. `"MediaBox"`.
    #[getter]
    fn pdf_key(&self) -> &'static str {
        PageBox::from(*self).pdf_key()
    }

    fn fallback(&self) -> Option<PyPageBox> {
        PageBox::from(*self).fallback().map(PyPageBox::from)
    }
});

py_enum!(PyRotation, Rotation, "rotation_enum" {
    Rotate0 = 0 => "rotate_0",
    Rotate90 = 1 => "rotate_90",
    Rotate180 = 2 => "rotate_180",
    Rotate270 = 3 => "rotate_270",
} methods {
    #[getter]
    fn degrees(&self) -> i64 {
        Rotation::from(*self).degrees()
    }
});

/// Permissions granted by the `/P` entry of an encryption dictionary.
#[pyfunction]
pub fn permissions_from_p(p: i32) -> Vec<PyPermission> {
    Permissions::from_p_value(p)
        .iter()
        .map(PyPermission::from)
        .collect()
}

/// Normalise a `/Rotate` value.
#[pyfunction]
pub fn rotation_from_degrees(degrees: i64) -> PyResult<PyRotation> {
    Rotation::from_degrees(degrees)
        .map(PyRotation::from)
        .map_err(to_py_err)
}

fn export_members<T: ExportedEnum>(m: &Bound<'_, PyModule>, table: &EnumTable) -> PyResult<()> {
    m.add_class::<T>()?;
    for c in &table.constants {
        let member = T::from_value(c.value).ok_or_else(|| {
            PyValueError::new_err(format!("{}.{} has no binding", table.name, c.name))
        })?;
        m.add(c.name, Bound::new(m.py(), member)?)?;
    }
    Ok(())
}

/// Add one enum class and its members to the module.
pub fn register_table(m: &Bound<'_, PyModule>, table: &EnumTable) -> PyResult<()> {
    match table.name {
        Permission::KIND => export_members::<PyPermission>(m, table),
        PageBox::KIND => export_members::<PyPageBox>(m, table),
        Rotation::KIND => export_members::<PyRotation>(m, table),
        other => Err(PyValueError::new_err(format!("no binding for enum {other}"))),
    }
}
