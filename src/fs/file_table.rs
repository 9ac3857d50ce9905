/// 单个文件的元数据和块索引
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub in_use: bool,       // 该槽位是否是存活文件
    pub name: String,       // 文件名，存活记录间唯一
    pub size: usize,        // 创建时声明的字节数，之后不变
    pub blocks: Vec<usize>, // 数据块编号，顺序决定逻辑字节布局
}

impl FileRecord {
    pub fn empty() -> Self {
        Self {
            in_use: false,
            name: String::new(),
            size: 0,
            blocks: Vec::new(),
        }
    }
}

/// 文件表：固定容量的记录数组，槽位在删除后可复用。
#[derive(Debug)]
pub struct FileTable {
    pub records: Vec<FileRecord>,
}

impl FileTable {
    pub fn new(max_files: usize) -> Self {
        Self {
            records: vec![FileRecord::empty(); max_files],
        }
    }

    /// 按名字查找存活文件，返回槽位编号。精确比较，区分大小写。
    pub fn find(&self, name: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.in_use && r.name == name)
    }

    /// 取最低编号的空闲槽位，表满时返回 None
    pub fn alloc_slot(&self) -> Option<usize> {
        self.records.iter().position(|r| !r.in_use)
    }

    /// 清空一个槽位。块必须已由上层释放完毕。
    pub fn free_slot(&mut self, slot: usize) {
        self.records[slot] = FileRecord::empty();
    }

    /// 按槽位顺序遍历所有存活记录
    pub fn live(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| r.in_use)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }
}
