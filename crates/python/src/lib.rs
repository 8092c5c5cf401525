//! Python bindings for quire
//!
//! This crate exposes the string boundary converter and the PDF library's
//! enums to Python. The module namespace is built from
//! [`quire_core::Registry`] when the interpreter imports `_quire`.

pub mod enums;
pub mod ustring;

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use quire_core::Registry;

use crate::ustring::to_py_err;

fn register_functions(m: &Bound<'_, PyModule>, registry: &Registry) -> PyResult<()> {
    for entry in registry.functions() {
        let func = match entry.name {
            "ustring" => wrap_pyfunction!(ustring::ustring, m)?,
            "from_ustring" => wrap_pyfunction!(ustring::from_ustring, m)?,
            "permissions_from_p" => wrap_pyfunction!(enums::permissions_from_p, m)?,
            "rotation_from_degrees" => wrap_pyfunction!(enums::rotation_from_degrees, m)?,
            other => {
                return Err(PyRuntimeError::new_err(format!(
                    "no binding for function {other}"
                )));
            }
        };
        m.add_function(func)?;
    }
    Ok(())
}

/// Populate `m` from `registry`.
pub fn register(m: &Bound<'_, PyModule>, registry: &Registry) -> PyResult<()> {
    registry.validate().map_err(to_py_err)?;
    for table in registry.enums() {
        tracing::debug!(table = table.name, "registering enum");
        enums::register_table(m, table)?;
    }
    for alias in registry.aliases() {
        let target = registry.resolve_alias(alias).map_err(to_py_err)?;
        m.add(alias.name, m.getattr(target.name)?)?;
    }
    ustring::register(m)?;
    register_functions(m, registry)
}

#[pymodule]
fn _quire(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    register(m, &quire_core::init())
}

#[cfg(all(test, feature = "python-tests"))]
mod tests {
    use super::*;
    use pyo3::exceptions::PyValueError;
    use pyo3::types::PyBytes;

    fn with_module<F>(f: F)
    where
        F: for<'py> FnOnce(Python<'py>, &Bound<'py, PyModule>) -> PyResult<()>,
    {
        Python::attach(|py| {
            let m = PyModule::new(py, "_quire").expect("create module");
            _quire(&m).expect("init module");
            f(py, &m).expect("test body");
        });
    }

    /// Every failure is a `ValueError`; only malformed text is an
    /// `EncodingError`.
    fn assert_value_error(
        py: Python<'_>,
        m: &Bound<'_, PyModule>,
        result: PyResult<Bound<'_, PyAny>>,
        encoding: bool,
    ) -> PyResult<()> {
        let err = match result {
            Ok(value) => panic!("expected an error, got {value}"),
            Err(err) => err,
        };
        let encoding_error = m.getattr("EncodingError")?;
        assert!(err.is_instance_of::<PyValueError>(py), "{err}");
        assert_eq!(err.is_instance(py, &encoding_error), encoding, "{err}");
        Ok(())
    }

    #[test]
    fn test_module_exports_registry_names() {
        with_module(|_py, m| {
            for name in quire_core::init().exported_names() {
                assert!(m.hasattr(name)?, "missing {name}");
            }
            assert!(m.hasattr("_ustring")?);
            assert!(m.hasattr("EncodingError")?);
            Ok(())
        });
    }

    #[test]
    fn test_ustring_roundtrip_from_str() {
        with_module(|_py, m| {
            let u = m.getattr("ustring")?.call1(("café 📄",))?;
            assert_eq!(u.len()?, 7);
            let back: String = m.getattr("from_ustring")?.call1((&u,))?.extract()?;
            assert_eq!(back, "café 📄");
            assert_eq!(u.str()?.to_cow()?, "café 📄");
            Ok(())
        });
    }

    #[test]
    fn test_ustring_from_bytes() {
        with_module(|py, m| {
            let data = PyBytes::new(py, "café".as_bytes());
            let u = m.getattr("ustring")?.call1((data,))?;
            let utf8 = u.call_method0("to_utf8")?;
            assert_eq!(utf8.extract::<Vec<u8>>()?, "café".as_bytes());
            Ok(())
        });
    }

    #[test]
    fn test_malformed_bytes_raise_encoding_error() {
        with_module(|py, m| {
            let data = PyBytes::new(py, &[0x80]);
            let err = m.getattr("ustring")?.call1((data,)).unwrap_err();
            let encoding_error = m.getattr("EncodingError")?;
            assert!(err.is_instance(py, &encoding_error));
            assert!(err.is_instance_of::<pyo3::exceptions::PyValueError>(py));
            Ok(())
        });
    }

    #[test]
    fn test_enum_members_exported_at_module_level() {
        with_module(|_py, m| {
            let rotate = m.getattr("rotate_270")?;
            assert_eq!(rotate.getattr("value")?.extract::<i64>()?, 3);
            assert_eq!(rotate.getattr("degrees")?.extract::<i64>()?, 270);
            let cls = m.getattr("rotation_enum")?;
            assert!(rotate.is_instance(&cls)?);
            assert!(rotate.eq(cls.getattr("rotate_270")?)?);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_text_raises_encoding_error() {
        with_module(|py, m| {
            let cls = m.getattr("_ustring")?;
            assert_value_error(py, m, cls.call_method1("from_utf16", (vec![0xD800u16],)), true)?;

            let euro = m.getattr("ustring")?.call1(("€",))?;
            assert_value_error(py, m, euro.call_method0("to_latin1"), true)?;
            Ok(())
        });
    }

    #[test]
    fn test_str_with_lone_surrogate_raises_encoding_error() {
        with_module(|py, m| {
            let text = py.eval(c"'a\\ud800'", None, None)?;
            assert_value_error(py, m, m.getattr("ustring")?.call1((text,)), true)
        });
    }

    #[test]
    fn test_bad_values_raise_plain_value_error() {
        with_module(|py, m| {
            let rotate = m.getattr("rotation_from_degrees")?;
            assert_value_error(py, m, rotate.call1((45,)), false)?;

            let cls = m.getattr("rotation_enum")?;
            assert_value_error(py, m, cls.call_method1("from_value", (9,)), false)?;
            Ok(())
        });
    }

    #[test]
    fn test_permissions_and_rotation_helpers() {
        with_module(|_py, m| {
            let perms = m.getattr("permissions_from_p")?.call1((-3900,))?;
            assert_eq!(perms.len()?, 1);
            assert!(perms.get_item(0)?.eq(m.getattr("print")?)?);

            let rotation = m.getattr("rotation_from_degrees")?.call1((-90,))?;
            assert!(rotation.eq(m.getattr("rotate_270")?)?);
            Ok(())
        });
    }

    #[test]
    fn test_page_box_fallback() {
        with_module(|_py, m| {
            let trim = m.getattr("trim_box")?;
            assert!(trim.call_method0("fallback")?.eq(m.getattr("crop_box")?)?);
            assert_eq!(trim.getattr("pdf_key")?.extract::<String>()?, "TrimBox");
            assert!(m.getattr("media_box")?.call_method0("fallback")?.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_ustring_latin1_eq_and_hash() {
        with_module(|py, m| {
            let cls = m.getattr("_ustring")?;
            let latin = cls.call_method1("from_latin1", (PyBytes::new(py, &[0x63, 0xE9]),))?;
            assert_eq!(latin.str()?.to_cow()?, "cé");

            let same = m.getattr("ustring")?.call1(("cé",))?;
            assert!(latin.eq(&same)?);
            assert_eq!(latin.hash()?, same.hash()?);
            assert!(!latin.eq(m.getattr("ustring")?.call1(("ce",))?)?);
            Ok(())
        });
    }

    #[test]
    fn test_legacy_rotation_aliases() {
        with_module(|_py, m| {
            assert!(m.getattr("rotate18_0")?.eq(m.getattr("rotate_180")?)?);
            assert!(m.getattr("rotate27_0")?.eq(m.getattr("rotate_270")?)?);
            Ok(())
        });
    }
}
