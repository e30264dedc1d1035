use std::{collections::BTreeMap, fmt, io, sync::Arc};

#[derive(Debug, Clone)]
pub struct MeshError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub causes: Vec<MeshCause>,
}

#[derive(Debug, Clone)]
pub enum MeshCause {
    Mesh(Box<MeshError>),
    Std(Arc<dyn std::error::Error + Send + Sync>),
}

impl MeshError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(MeshCause::Std(Arc::new(cause)));
        self
    }
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|c| match c {
            MeshCause::Mesh(e) => Some(e.as_ref() as &dyn std::error::Error),
            MeshCause::Std(e) => Some(e.as_ref()),
        })
    }
}

impl From<io::Error> for MeshError {
    fn from(err: io::Error) -> Self {
        MeshError::new("io-error").push_std(err)
    }
}

impl From<image::ImageError> for MeshError {
    fn from(err: image::ImageError) -> Self {
        MeshError::new("image-error").push_std(err)
    }
}
