//! String boundary bindings for Python.
//!
//! Exposes the wide string as `_ustring` along with `ustring()` and
//! `from_ustring()`.

use std::fmt;

use pyo3::buffer::PyBuffer;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyString};
use quire_core::{QuireError, UString, to_external, to_internal};

pyo3::create_exception!(quire, EncodingError, PyValueError);

/// Inputs at or above this size are transcoded with the GIL released.
const DETACH_THRESHOLD: usize = 64 * 1024;

pub fn to_py_err(err: QuireError) -> PyErr {
    if err.is_encoding() {
        EncodingError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

fn bytes_from_py(py: Python<'_>, data: &Bound<'_, PyAny>, label: &str) -> PyResult<Vec<u8>> {
    let buf = PyBuffer::<u8>::get(data)
        .map_err(|_| PyTypeError::new_err(format!("{label} expects str or a bytes-like object")))?;
    buf.to_vec(py)
}

fn decode_utf8(py: Python<'_>, bytes: &[u8]) -> Result<UString, QuireError> {
    if bytes.len() >= DETACH_THRESHOLD {
        py.detach(|| to_internal(bytes))
    } else {
        to_internal(bytes)
    }
}

#[pyclass(name = "_ustring", module = "quire", frozen, eq, hash, str)]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PyUString {
    inner: UString,
}

impl From<UString> for PyUString {
    fn from(inner: UString) -> Self {
        Self { inner }
    }
}

impl fmt::Display for PyUString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl PyUString {
    pub fn inner(&self) -> &UString {
        &self.inner
    }
}

#[pymethods]
impl PyUString {
    fn __repr__(&self) -> String {
        format!("_ustring({:?})", self.inner.to_string())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// UTF-8 bytes of the string.
    fn to_utf8<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new(py, &to_external(&self.inner))
    }

    fn to_latin1<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self.inner.to_latin1().map_err(to_py_err)?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// The UTF-16 code units.
    fn units(&self) -> Vec<u16> {
        self.inner.as_units().to_vec()
    }

    #[staticmethod]
    fn from_latin1(py: Python<'_>, data: &Bound<'_, PyAny>) -> PyResult<Self> {
        let bytes = bytes_from_py(py, data, "_ustring.from_latin1")?;
        Ok(UString::from_latin1(&bytes).into())
    }

    #[staticmethod]
    fn from_utf16(units: Vec<u16>) -> PyResult<Self> {
        UString::from_utf16(&units).map(Self::from).map_err(to_py_err)
    }
}

/// Convert text to the library's wide string.
///
/// Bytes-like objects must hold UTF-8. Malformed bytes, and a `str` holding
/// lone surrogates, raise `EncodingError`.
#[pyfunction]
pub fn ustring(py: Python<'_>, text: &Bound<'_, PyAny>) -> PyResult<PyUString> {
    if text.is_instance_of::<PyString>() {
        let s: String = text.extract().map_err(|err: PyErr| {
            let wrapped = EncodingError::new_err(format!(
                "str is not encodable as UTF-8: {}",
                err.value(py)
            ));
            wrapped.set_cause(py, Some(err));
            wrapped
        })?;
        return Ok(UString::from(s).into());
    }
    let bytes = bytes_from_py(py, text, "ustring")?;
    decode_utf8(py, &bytes).map(PyUString::from).map_err(to_py_err)
}

/// Convert a wide string back to `str`.
#[pyfunction]
pub fn from_ustring(value: PyRef<'_, PyUString>) -> String {
    value.inner.to_string()
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyUString>()?;
    m.add("EncodingError", m.py().get_type::<EncodingError>())?;
    Ok(())
}
