pub mod europeana_utils;
