//! Built-in us-east-1 on-demand catalog
//!
//! Declaration order is the catalog iteration order and the tie-break for
//! equal prices.

use crate::models::Category::{self, Compute, General, Memory, Storage};

/// Version tag of the built-in price table
pub const BUILTIN_CATALOG_VERSION: &str = "us-east-1-on-demand-2024.1";

/// (identifier, vcpus, memory_gb, hourly_price, family, generation, category)
pub(crate) type InstanceRow = (&'static str, u32, f64, f64, &'static str, u32, Category);

#[rustfmt::skip]
pub(crate) const INSTANCE_ROWS: &[InstanceRow] = &[
    // General Purpose - M5 Family
    ("m5.large", 2, 8.0, 0.096, "m5", 5, General),
    ("m5.xlarge", 4, 16.0, 0.192, "m5", 5, General),
    ("m5.2xlarge", 8, 32.0, 0.384, "m5", 5, General),
    ("m5.4xlarge", 16, 64.0, 0.768, "m5", 5, General),
    ("m5.8xlarge", 32, 128.0, 1.536, "m5", 5, General),
    ("m5.12xlarge", 48, 192.0, 2.304, "m5", 5, General),
    ("m5.16xlarge", 64, 256.0, 3.072, "m5", 5, General),
    ("m5.24xlarge", 96, 384.0, 4.608, "m5", 5, General),
    // General Purpose - M5a Family (AMD)
    ("m5a.large", 2, 8.0, 0.086, "m5a", 5, General),
    ("m5a.xlarge", 4, 16.0, 0.172, "m5a", 5, General),
    ("m5a.2xlarge", 8, 32.0, 0.344, "m5a", 5, General),
    ("m5a.4xlarge", 16, 64.0, 0.688, "m5a", 5, General),
    ("m5a.8xlarge", 32, 128.0, 1.376, "m5a", 5, General),
    ("m5a.12xlarge", 48, 192.0, 2.064, "m5a", 5, General),
    ("m5a.16xlarge", 64, 256.0, 2.752, "m5a", 5, General),
    ("m5a.24xlarge", 96, 384.0, 4.128, "m5a", 5, General),
    // General Purpose - M6i Family
    ("m6i.large", 2, 8.0, 0.096, "m6i", 6, General),
    ("m6i.xlarge", 4, 16.0, 0.192, "m6i", 6, General),
    ("m6i.2xlarge", 8, 32.0, 0.384, "m6i", 6, General),
    ("m6i.4xlarge", 16, 64.0, 0.768, "m6i", 6, General),
    ("m6i.8xlarge", 32, 128.0, 1.536, "m6i", 6, General),
    ("m6i.12xlarge", 48, 192.0, 2.304, "m6i", 6, General),
    ("m6i.16xlarge", 64, 256.0, 3.072, "m6i", 6, General),
    ("m6i.24xlarge", 96, 384.0, 4.608, "m6i", 6, General),
    // General Purpose - M7i Family
    ("m7i.large", 2, 8.0, 0.1008, "m7i", 7, General),
    ("m7i.xlarge", 4, 16.0, 0.2016, "m7i", 7, General),
    ("m7i.2xlarge", 8, 32.0, 0.4032, "m7i", 7, General),
    ("m7i.4xlarge", 16, 64.0, 0.8064, "m7i", 7, General),
    ("m7i.8xlarge", 32, 128.0, 1.6128, "m7i", 7, General),
    ("m7i.12xlarge", 48, 192.0, 2.4192, "m7i", 7, General),
    ("m7i.16xlarge", 64, 256.0, 3.2256, "m7i", 7, General),
    ("m7i.24xlarge", 96, 384.0, 4.8384, "m7i", 7, General),
    // Compute Optimized - C5 Family
    ("c5.large", 2, 4.0, 0.085, "c5", 5, Compute),
    ("c5.xlarge", 4, 8.0, 0.17, "c5", 5, Compute),
    ("c5.2xlarge", 8, 16.0, 0.34, "c5", 5, Compute),
    ("c5.4xlarge", 16, 32.0, 0.68, "c5", 5, Compute),
    ("c5.9xlarge", 36, 72.0, 1.53, "c5", 5, Compute),
    ("c5.12xlarge", 48, 96.0, 2.04, "c5", 5, Compute),
    ("c5.18xlarge", 72, 144.0, 3.06, "c5", 5, Compute),
    ("c5.24xlarge", 96, 192.0, 4.08, "c5", 5, Compute),
    // Compute Optimized - C5a Family (AMD)
    ("c5a.large", 2, 4.0, 0.077, "c5a", 5, Compute),
    ("c5a.xlarge", 4, 8.0, 0.154, "c5a", 5, Compute),
    ("c5a.2xlarge", 8, 16.0, 0.308, "c5a", 5, Compute),
    ("c5a.4xlarge", 16, 32.0, 0.616, "c5a", 5, Compute),
    ("c5a.8xlarge", 32, 64.0, 1.232, "c5a", 5, Compute),
    ("c5a.12xlarge", 48, 96.0, 1.848, "c5a", 5, Compute),
    ("c5a.16xlarge", 64, 128.0, 2.464, "c5a", 5, Compute),
    ("c5a.24xlarge", 96, 192.0, 3.696, "c5a", 5, Compute),
    // Compute Optimized - C6i Family
    ("c6i.large", 2, 4.0, 0.085, "c6i", 6, Compute),
    ("c6i.xlarge", 4, 8.0, 0.17, "c6i", 6, Compute),
    ("c6i.2xlarge", 8, 16.0, 0.34, "c6i", 6, Compute),
    ("c6i.4xlarge", 16, 32.0, 0.68, "c6i", 6, Compute),
    ("c6i.8xlarge", 32, 64.0, 1.36, "c6i", 6, Compute),
    ("c6i.12xlarge", 48, 96.0, 2.04, "c6i", 6, Compute),
    ("c6i.16xlarge", 64, 128.0, 2.72, "c6i", 6, Compute),
    ("c6i.24xlarge", 96, 192.0, 4.08, "c6i", 6, Compute),
    // Compute Optimized - C7i Family
    ("c7i.large", 2, 4.0, 0.0893, "c7i", 7, Compute),
    ("c7i.xlarge", 4, 8.0, 0.1785, "c7i", 7, Compute),
    ("c7i.2xlarge", 8, 16.0, 0.357, "c7i", 7, Compute),
    ("c7i.4xlarge", 16, 32.0, 0.714, "c7i", 7, Compute),
    ("c7i.8xlarge", 32, 64.0, 1.428, "c7i", 7, Compute),
    ("c7i.12xlarge", 48, 96.0, 2.142, "c7i", 7, Compute),
    ("c7i.16xlarge", 64, 128.0, 2.856, "c7i", 7, Compute),
    ("c7i.24xlarge", 96, 192.0, 4.284, "c7i", 7, Compute),
    // Memory Optimized - R5 Family
    ("r5.large", 2, 16.0, 0.126, "r5", 5, Memory),
    ("r5.xlarge", 4, 32.0, 0.252, "r5", 5, Memory),
    ("r5.2xlarge", 8, 64.0, 0.504, "r5", 5, Memory),
    ("r5.4xlarge", 16, 128.0, 1.008, "r5", 5, Memory),
    ("r5.8xlarge", 32, 256.0, 2.016, "r5", 5, Memory),
    ("r5.12xlarge", 48, 384.0, 3.024, "r5", 5, Memory),
    ("r5.16xlarge", 64, 512.0, 4.032, "r5", 5, Memory),
    ("r5.24xlarge", 96, 768.0, 6.048, "r5", 5, Memory),
    // Memory Optimized - R5a Family (AMD)
    ("r5a.large", 2, 16.0, 0.113, "r5a", 5, Memory),
    ("r5a.xlarge", 4, 32.0, 0.226, "r5a", 5, Memory),
    ("r5a.2xlarge", 8, 64.0, 0.452, "r5a", 5, Memory),
    ("r5a.4xlarge", 16, 128.0, 0.904, "r5a", 5, Memory),
    ("r5a.8xlarge", 32, 256.0, 1.808, "r5a", 5, Memory),
    ("r5a.12xlarge", 48, 384.0, 2.712, "r5a", 5, Memory),
    ("r5a.16xlarge", 64, 512.0, 3.616, "r5a", 5, Memory),
    ("r5a.24xlarge", 96, 768.0, 5.424, "r5a", 5, Memory),
    // Memory Optimized - R6i Family
    ("r6i.large", 2, 16.0, 0.126, "r6i", 6, Memory),
    ("r6i.xlarge", 4, 32.0, 0.252, "r6i", 6, Memory),
    ("r6i.2xlarge", 8, 64.0, 0.504, "r6i", 6, Memory),
    ("r6i.4xlarge", 16, 128.0, 1.008, "r6i", 6, Memory),
    ("r6i.8xlarge", 32, 256.0, 2.016, "r6i", 6, Memory),
    ("r6i.12xlarge", 48, 384.0, 3.024, "r6i", 6, Memory),
    ("r6i.16xlarge", 64, 512.0, 4.032, "r6i", 6, Memory),
    ("r6i.24xlarge", 96, 768.0, 6.048, "r6i", 6, Memory),
    // Memory Optimized - R7i Family
    ("r7i.large", 2, 16.0, 0.1323, "r7i", 7, Memory),
    ("r7i.xlarge", 4, 32.0, 0.2646, "r7i", 7, Memory),
    ("r7i.2xlarge", 8, 64.0, 0.5292, "r7i", 7, Memory),
    ("r7i.4xlarge", 16, 128.0, 1.0584, "r7i", 7, Memory),
    ("r7i.8xlarge", 32, 256.0, 2.1168, "r7i", 7, Memory),
    ("r7i.12xlarge", 48, 384.0, 3.1752, "r7i", 7, Memory),
    ("r7i.16xlarge", 64, 512.0, 4.2336, "r7i", 7, Memory),
    ("r7i.24xlarge", 96, 768.0, 6.3504, "r7i", 7, Memory),
    // Storage Optimized - I3 Family
    ("i3.large", 2, 15.25, 0.156, "i3", 3, Storage),
    ("i3.xlarge", 4, 30.5, 0.312, "i3", 3, Storage),
    ("i3.2xlarge", 8, 61.0, 0.624, "i3", 3, Storage),
    ("i3.4xlarge", 16, 122.0, 1.248, "i3", 3, Storage),
    ("i3.8xlarge", 32, 244.0, 2.496, "i3", 3, Storage),
    ("i3.16xlarge", 64, 488.0, 4.992, "i3", 3, Storage),
    // Storage Optimized - D2 Family
    ("d2.xlarge", 4, 30.5, 0.69, "d2", 2, Storage),
    ("d2.2xlarge", 8, 61.0, 1.38, "d2", 2, Storage),
    ("d2.4xlarge", 16, 122.0, 2.76, "d2", 2, Storage),
    ("d2.8xlarge", 36, 244.0, 5.52, "d2", 2, Storage),
    // General Purpose - M6g Family (Graviton2)
    ("m6g.large", 2, 8.0, 0.077, "m6g", 6, General),
    ("m6g.xlarge", 4, 16.0, 0.154, "m6g", 6, General),
    ("m6g.2xlarge", 8, 32.0, 0.308, "m6g", 6, General),
    ("m6g.4xlarge", 16, 64.0, 0.616, "m6g", 6, General),
    ("m6g.8xlarge", 32, 128.0, 1.232, "m6g", 6, General),
    ("m6g.12xlarge", 48, 192.0, 1.848, "m6g", 6, General),
    ("m6g.16xlarge", 64, 256.0, 2.464, "m6g", 6, General),
    // General Purpose - M7g Family (Graviton3)
    ("m7g.large", 2, 8.0, 0.0816, "m7g", 7, General),
    ("m7g.xlarge", 4, 16.0, 0.1632, "m7g", 7, General),
    ("m7g.2xlarge", 8, 32.0, 0.3264, "m7g", 7, General),
    ("m7g.4xlarge", 16, 64.0, 0.6528, "m7g", 7, General),
    ("m7g.8xlarge", 32, 128.0, 1.3056, "m7g", 7, General),
    ("m7g.12xlarge", 48, 192.0, 1.9584, "m7g", 7, General),
    ("m7g.16xlarge", 64, 256.0, 2.6112, "m7g", 7, General),
    // Compute Optimized - C6g Family (Graviton2)
    ("c6g.large", 2, 4.0, 0.068, "c6g", 6, Compute),
    ("c6g.xlarge", 4, 8.0, 0.136, "c6g", 6, Compute),
    ("c6g.2xlarge", 8, 16.0, 0.272, "c6g", 6, Compute),
    ("c6g.4xlarge", 16, 32.0, 0.544, "c6g", 6, Compute),
    ("c6g.8xlarge", 32, 64.0, 1.088, "c6g", 6, Compute),
    ("c6g.12xlarge", 48, 96.0, 1.632, "c6g", 6, Compute),
    ("c6g.16xlarge", 64, 128.0, 2.176, "c6g", 6, Compute),
    // Compute Optimized - C7g Family (Graviton3)
    ("c7g.large", 2, 4.0, 0.0725, "c7g", 7, Compute),
    ("c7g.xlarge", 4, 8.0, 0.145, "c7g", 7, Compute),
    ("c7g.2xlarge", 8, 16.0, 0.29, "c7g", 7, Compute),
    ("c7g.4xlarge", 16, 32.0, 0.58, "c7g", 7, Compute),
    ("c7g.8xlarge", 32, 64.0, 1.16, "c7g", 7, Compute),
    ("c7g.12xlarge", 48, 96.0, 1.74, "c7g", 7, Compute),
    ("c7g.16xlarge", 64, 128.0, 2.32, "c7g", 7, Compute),
    // Memory Optimized - R6g Family (Graviton2)
    ("r6g.large", 2, 16.0, 0.1008, "r6g", 6, Memory),
    ("r6g.xlarge", 4, 32.0, 0.2016, "r6g", 6, Memory),
    ("r6g.2xlarge", 8, 64.0, 0.4032, "r6g", 6, Memory),
    ("r6g.4xlarge", 16, 128.0, 0.8064, "r6g", 6, Memory),
    ("r6g.8xlarge", 32, 256.0, 1.6128, "r6g", 6, Memory),
    ("r6g.12xlarge", 48, 384.0, 2.4192, "r6g", 6, Memory),
    ("r6g.16xlarge", 64, 512.0, 3.2256, "r6g", 6, Memory),
    // Memory Optimized - R7g Family (Graviton3)
    ("r7g.large", 2, 16.0, 0.1071, "r7g", 7, Memory),
    ("r7g.xlarge", 4, 32.0, 0.2142, "r7g", 7, Memory),
    ("r7g.2xlarge", 8, 64.0, 0.4284, "r7g", 7, Memory),
    ("r7g.4xlarge", 16, 128.0, 0.8568, "r7g", 7, Memory),
    ("r7g.8xlarge", 32, 256.0, 1.7136, "r7g", 7, Memory),
    ("r7g.12xlarge", 48, 384.0, 2.5704, "r7g", 7, Memory),
    ("r7g.16xlarge", 64, 512.0, 3.4272, "r7g", 7, Memory),
];
