/// This module provides the XML tree and the cursor reader that fills model objects from it.
pub mod xml;
